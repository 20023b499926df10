//! Fixed-capacity byte buffers that make up a message.
//!
//! A chunk is allocated once at full capacity and never grows. Bytes
//! `[0, len)` are valid written data; the remainder is zero padding that is
//! never put on the wire.

use static_assertions::{assert_eq_size, assert_impl_all, assert_not_impl_any};

/// Capacity of every chunk, in bytes.
pub const CHUNK_SIZE: usize = 4096;

/// One fixed-size buffer in a [`WriteMessage`](crate::WriteMessage) chain.
#[derive(Debug)]
pub struct Chunk {
    filled: usize,
    data: Box<[u8; CHUNK_SIZE]>,
}

// Two words per chain entry; the buffer itself lives out of line.
assert_eq_size!(Chunk, [usize; 2]);

// Move-only: two owners must never diverge on the same buffer.
assert_not_impl_any!(Chunk: Clone, Copy);
assert_impl_all!(Chunk: Send);

impl Chunk {
    /// Allocate an empty chunk.
    ///
    /// Allocation failure is reported instead of aborting the process.
    pub fn try_new() -> Result<Self, AllocError> {
        let mut data = Vec::new();
        data.try_reserve_exact(CHUNK_SIZE)
            .map_err(|_| AllocError { requested: CHUNK_SIZE })?;
        data.resize(CHUNK_SIZE, 0);
        let data: Box<[u8; CHUNK_SIZE]> = data
            .into_boxed_slice()
            .try_into()
            .map_err(|_| AllocError { requested: CHUNK_SIZE })?;
        tracing::trace!(capacity = CHUNK_SIZE, "chunk allocated");
        Ok(Self { filled: 0, data })
    }

    /// Copy up to `count` bytes of `data`, starting at `offset`, into the
    /// free space of this chunk.
    ///
    /// Returns the number of bytes consumed, which is
    /// `min(count, self.remaining())`. A full chunk consumes nothing.
    ///
    /// # Panics
    ///
    /// Panics if `offset..offset + count` is out of bounds for `data`, the
    /// same way slice indexing does.
    pub fn append_into(&mut self, data: &[u8], offset: usize, count: usize) -> usize {
        let take = count.min(self.remaining());
        let src = &data[offset..][..count];
        self.data[self.filled..self.filled + take].copy_from_slice(&src[..take]);
        self.filled += take;
        take
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn is_full(&self) -> bool {
        self.filled == CHUNK_SIZE
    }

    /// Free space left before the chunk is full.
    pub fn remaining(&self) -> usize {
        CHUNK_SIZE - self.filled
    }

    /// The valid region `[0, len)`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.filled]
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// A chunk buffer could not be allocated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to allocate {requested}-byte chunk")]
pub struct AllocError {
    pub requested: usize,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
