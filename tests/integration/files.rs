use std::fs::File;

use archive_core::config::FlushSettings;
use archive_core::{
    read_full, send_message, send_message_with, IoSink, IoSource, WriteMessage, CHUNK_SIZE,
};

use crate::*;

// ══════════════════════════════════════════════════════════════════════════════
//  Flushing to and reading back from files
// ══════════════════════════════════════════════════════════════════════════════

/// Several appends spanning chunk edges land in the file byte-for-byte.
#[test]
fn test_file_round_trip() {
    let scratch = Scratch::new("round-trip").unwrap();
    let path = scratch.path("payload.bin");

    let parts = [pattern(100, 1), pattern(CHUNK_SIZE, 2), pattern(3 * CHUNK_SIZE + 9, 3)];
    let mut msg = WriteMessage::new();
    let mut expected = Vec::new();
    for part in &parts {
        msg.append(part).unwrap();
        expected.extend_from_slice(part);
    }
    assert_eq!(msg.chunk_count(), 5);

    let mut sink = IoSink::new(File::create(&path).unwrap());
    let stats = send_message(&mut sink, msg).unwrap();
    drop(sink);

    assert_eq!(stats.bytes, expected.len());
    assert_eq!(stats.chunks, 5);
    assert_eq!(read_file(&path).unwrap(), expected);
}

/// A reader loops over the file in chunk-sized pieces and sees EOF as a
/// short final read.
#[test]
fn test_read_back_in_pieces() {
    let scratch = Scratch::new("pieces").unwrap();
    let path = scratch.path("payload.bin");
    let data = pattern(2 * CHUNK_SIZE + 77, 9);
    std::fs::write(&path, &data).unwrap();

    let mut source = IoSource::new(File::open(&path).unwrap());
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut collected = Vec::new();
    loop {
        let n = read_full(&mut source, &mut buf).unwrap();
        collected.extend_from_slice(&buf[..n]);
        if n < buf.len() {
            break;
        }
    }

    assert_eq!(collected, data);
    assert_eq!(read_full(&mut source, &mut buf).unwrap(), 0, "EOF is sticky");
}

/// Flushing without sync still writes everything through an unbuffered
/// file.
#[test]
fn test_flush_without_sync() {
    let scratch = Scratch::new("nosync").unwrap();
    let path = scratch.path("payload.bin");

    let mut msg = WriteMessage::new();
    let _ = &mut msg << 1u64 << 2u64;

    let mut sink = IoSink::new(File::create(&path).unwrap());
    send_message_with(&mut sink, msg, &FlushSettings { sync: false }).unwrap();
    drop(sink);

    let mut expected = 1u64.to_ne_bytes().to_vec();
    expected.extend_from_slice(&2u64.to_ne_bytes());
    assert_eq!(read_file(&path).unwrap(), expected);
}

/// Writing to a read-only handle is a stream failure on the first chunk.
#[test]
fn test_unwritable_file_reports_stream_error() {
    let scratch = Scratch::new("readonly").unwrap();
    let path = scratch.path("payload.bin");
    std::fs::write(&path, b"").unwrap();

    let mut msg = WriteMessage::new();
    msg.append(b"data").unwrap();

    let mut sink = IoSink::new(File::open(&path).unwrap());
    let err = send_message(&mut sink, msg).unwrap_err();
    assert!(
        matches!(err, archive_core::ArchiveError::Stream { chunk: 0, .. }),
        "unexpected error: {err}"
    );
}
