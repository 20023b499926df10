//! Flush — walk a message's chunk chain into a sink.
//!
//! One `write` per non-empty chunk, in chain order. The first failure stops
//! transmission; chunks already written stay written.

use crate::config::FlushSettings;
use crate::message::{ArchiveError, WriteMessage};
use crate::stream::{ByteSink, StreamError};

/// What a flush put on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub chunks: usize,
    pub bytes: usize,
}

/// Send `msg` to `sink` with default settings.
pub fn send_message<S: ByteSink + ?Sized>(
    sink: &mut S,
    msg: WriteMessage,
) -> Result<FlushStats, ArchiveError> {
    send_message_with(sink, msg, &FlushSettings::default())
}

/// Send `msg` to `sink`, consuming it.
///
/// A message carrying a recorded serialization error is not sent at all;
/// the error is returned instead.
pub fn send_message_with<S: ByteSink + ?Sized>(
    sink: &mut S,
    mut msg: WriteMessage,
    settings: &FlushSettings,
) -> Result<FlushStats, ArchiveError> {
    if let Some(err) = msg.take_error() {
        tracing::warn!(error = %err, "refusing to flush incomplete message");
        return Err(err);
    }

    let mut stats = FlushStats::default();
    for (index, chunk) in msg.into_chunks().iter().enumerate() {
        if chunk.is_empty() {
            continue;
        }
        let bytes = chunk.as_bytes();
        let written = sink.write(bytes).map_err(|source| {
            tracing::warn!(chunk = index, error = %source, "chunk write failed");
            ArchiveError::Stream {
                chunk: index,
                source,
            }
        })?;
        if written != bytes.len() {
            tracing::warn!(chunk = index, expected = bytes.len(), written, "sink reported short write");
            return Err(ArchiveError::Stream {
                chunk: index,
                source: StreamError::ShortWrite {
                    expected: bytes.len(),
                    written,
                },
            });
        }
        stats.chunks += 1;
        stats.bytes += written;
    }

    if settings.sync {
        sink.sync()?;
    }

    tracing::debug!(chunks = stats.chunks, bytes = stats.bytes, "message flushed");
    Ok(stats)
}
