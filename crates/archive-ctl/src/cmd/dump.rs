//! Hex dump of a binary payload.

use std::fs::File;
use std::io::Write;

use anyhow::{Context, Result};

use archive_core::config::DumpSettings;
use archive_core::{read_full, ByteSource, IoSource, CHUNK_SIZE};

pub fn cmd_dump(path: &str, settings: &DumpSettings) -> Result<()> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path))?;
    let mut source = IoSource::new(file);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let total = dump(&mut source, &mut out, settings.columns())
        .with_context(|| format!("failed to read {}", path))?;
    writeln!(out, "{} bytes", total)?;
    Ok(())
}

/// Write `offset  hex` lines for everything `source` yields. Returns the
/// byte count.
pub fn dump<S: ByteSource, W: Write>(source: &mut S, out: &mut W, columns: usize) -> Result<u64> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut pending: Vec<u8> = Vec::with_capacity(columns);
    let mut offset = 0u64;

    loop {
        let n = read_full(source, &mut buf)?;
        for &byte in &buf[..n] {
            pending.push(byte);
            if pending.len() == columns {
                write_line(out, offset, &pending)?;
                offset += pending.len() as u64;
                pending.clear();
            }
        }
        if n < buf.len() {
            break;
        }
    }
    if !pending.is_empty() {
        write_line(out, offset, &pending)?;
        offset += pending.len() as u64;
    }
    Ok(offset)
}

fn write_line<W: Write>(out: &mut W, offset: u64, bytes: &[u8]) -> Result<()> {
    writeln!(out, "{:08x}  {}", offset, hex::encode(bytes))?;
    Ok(())
}
