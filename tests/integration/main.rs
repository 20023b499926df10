//! archive integration test harness.
//!
//! These tests drive whole messages through real endpoints: files on disk
//! and sinks that fail partway through a flush.
//!
//!   cargo test --test integration
//!
//! Each test works in its own scratch directory and removes it afterwards.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use archive_core::{ByteSink, StreamError};

mod compose;
mod files;

// ── Harness ───────────────────────────────────────────────────────────────────

/// Scratch directory removed on drop, even if the test panics.
pub struct Scratch {
    dir: PathBuf,
}

impl Scratch {
    pub fn new(name: &str) -> Result<Self> {
        let dir = std::env::temp_dir().join(format!("archive-it-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create scratch dir: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

/// Deterministic test payload.
pub fn pattern(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(13).wrapping_add(seed))
        .collect()
}

pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Sink that accepts `budget` write calls and then reports the stream
/// closed, like a peer hanging up mid-message.
pub struct HangUp {
    pub received: Vec<Vec<u8>>,
    pub budget: usize,
    pub attempts: usize,
}

impl HangUp {
    pub fn after(budget: usize) -> Self {
        Self {
            received: Vec::new(),
            budget,
            attempts: 0,
        }
    }
}

impl ByteSink for HangUp {
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        self.attempts += 1;
        if self.received.len() == self.budget {
            return Err(StreamError::Closed);
        }
        self.received.push(buf.to_vec());
        Ok(buf.len())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_scratch_dir_is_removed() {
    let path = {
        let scratch = Scratch::new("scratch").unwrap();
        std::fs::write(scratch.path("probe"), b"x").unwrap();
        scratch.path("probe")
    };
    assert!(!path.exists(), "scratch dir should be gone after drop");
}
