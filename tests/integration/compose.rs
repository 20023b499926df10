use zerocopy::AsBytes;

use archive_core::{send_message, ArchiveError, Serialize, WriteMessage};

use crate::*;

// ══════════════════════════════════════════════════════════════════════════════
//  Domain types composed onto a message
// ══════════════════════════════════════════════════════════════════════════════

/// Fixed-layout header written with its in-memory representation.
#[derive(AsBytes)]
#[repr(C, packed)]
struct Header {
    kind: u8,
    flags: u8,
    length: u32,
}

struct Entry {
    key: u64,
    deleted: bool,
    score: f32,
}

impl Serialize for Entry {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        msg.write(&self.key)?.write(&self.deleted)?.write(&self.score)?;
        Ok(())
    }
}

struct Batch {
    header: Header,
    entries: Vec<Entry>,
}

impl Serialize for Batch {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        msg.append_pod(&self.header)?;
        msg.write(&self.entries)?;
        Ok(())
    }
}

fn entry_bytes(e: &Entry) -> Vec<u8> {
    let mut out = e.key.to_ne_bytes().to_vec();
    out.push(e.deleted as u8);
    out.extend_from_slice(&e.score.to_ne_bytes());
    out
}

/// A batch large enough to span chunks flushes to exactly the bytes of its
/// parts, in order.
#[test]
fn test_nested_types_flush_in_order() {
    let entries: Vec<Entry> = (0..1000)
        .map(|i| Entry {
            key: i,
            deleted: i % 3 == 0,
            score: i as f32 * 0.5,
        })
        .collect();
    let batch = Batch {
        header: Header { kind: 2, flags: 0, length: entries.len() as u32 },
        entries,
    };

    let mut expected = batch.header.as_bytes().to_vec();
    for e in &batch.entries {
        expected.extend_from_slice(&entry_bytes(e));
    }
    assert_eq!(expected.len(), 6 + 1000 * 13);

    let mut msg = WriteMessage::new();
    let _ = &mut msg << &batch;
    assert!(msg.error().is_none());
    assert_eq!(msg.chunk_count(), 4);

    let mut out: Vec<u8> = Vec::new();
    send_message(&mut out, msg).unwrap();
    assert_eq!(out, expected);
}

/// Operator chaining and explicit writes agree.
#[test]
fn test_operator_and_write_agree() {
    let a = Entry { key: u64::MAX, deleted: true, score: f32::NAN };
    let b = Entry { key: 0, deleted: false, score: f32::NEG_INFINITY };

    let mut chained = WriteMessage::new();
    let _ = &mut chained << &a << &b;

    let mut explicit = WriteMessage::new();
    explicit.write(&a).unwrap();
    explicit.write(&b).unwrap();

    assert_eq!(chained.to_bytes(), explicit.to_bytes());
    let mut expected = entry_bytes(&a);
    expected.extend_from_slice(&entry_bytes(&b));
    assert_eq!(&chained.to_bytes()[..], expected.as_slice());
}

/// Messages are independent owners and can be built on separate threads.
#[test]
fn test_messages_built_on_separate_threads() {
    let handles: Vec<_> = (0..4u8)
        .map(|seed| {
            std::thread::spawn(move || {
                let mut msg = WriteMessage::new();
                msg.append(&pattern(10_000, seed)).unwrap();
                msg
            })
        })
        .collect();

    for (seed, handle) in handles.into_iter().enumerate() {
        let msg = handle.join().unwrap();
        assert_eq!(&msg.to_bytes()[..], pattern(10_000, seed as u8).as_slice());
    }
}
