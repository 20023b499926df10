//! Encode a record file into a binary payload.

use std::fs::File;

use anyhow::{Context, Result};

use archive_core::config::FlushSettings;
use archive_core::{send_message_with, IoSink, WriteMessage};

use super::record::Record;

pub fn cmd_encode(record_path: &str, out_path: &str, flush: &FlushSettings) -> Result<()> {
    let record = Record::load(record_path)?;

    let mut msg = WriteMessage::new();
    msg.write(&record).context("failed to serialize record")?;
    tracing::debug!(fields = record.field.len(), bytes = msg.len(), "record serialized");

    let file = File::create(out_path)
        .with_context(|| format!("failed to create output file: {}", out_path))?;
    let mut sink = IoSink::new(file);
    let stats = send_message_with(&mut sink, msg, flush)
        .with_context(|| format!("failed to write {}", out_path))?;

    println!("═══════════════════════════════════════");
    println!("  Encoded {}", record_path);
    println!("═══════════════════════════════════════");
    println!("  Fields : {}", record.field.len());
    println!("  Chunks : {}", stats.chunks);
    println!("  Bytes  : {}", stats.bytes);
    println!("  Output : {}", out_path);

    Ok(())
}
