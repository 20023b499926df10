//! Outgoing message accumulation.
//!
//! A [`WriteMessage`] collects everything a writer wants to put on a stream
//! and hands it over in one piece, so callers neither flush after every few
//! bytes nor forget to flush buffered data. Serialize into a message, then
//! pass it to [`send_message`](crate::send_message).

use bytes::{Bytes, BytesMut};
use static_assertions::{assert_impl_all, assert_not_impl_any};
use zerocopy::AsBytes;

use crate::chunk::{AllocError, Chunk, CHUNK_SIZE};
use crate::serialize::Serialize;
use crate::stream::StreamError;

/// An ordered chain of [`Chunk`]s holding one outgoing message.
///
/// Append order is chain order is wire order. Chunks are created on demand
/// and are never reordered, merged or split afterwards.
#[derive(Debug, Default)]
pub struct WriteMessage {
    chunks: Vec<Chunk>,
    /// First failure recorded by the `<<` operator form.
    error: Option<ArchiveError>,
}

assert_not_impl_any!(WriteMessage: Clone);
assert_impl_all!(WriteMessage: Send);

impl WriteMessage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes to the message.
    ///
    /// Fills the current tail chunk before allocating new ones. An empty
    /// `data` allocates nothing. If a chunk cannot be allocated the call
    /// fails with [`ArchiveError::ResourceExhausted`]; bytes copied before
    /// the failure stay in the chain.
    pub fn append(&mut self, data: &[u8]) -> Result<(), ArchiveError> {
        let mut offset = 0;
        while offset < data.len() {
            if self.chunks.last().map_or(true, Chunk::is_full) {
                self.push_chunk()?;
            }
            let tail = self.chunks.len() - 1;
            offset += self.chunks[tail].append_into(data, offset, data.len() - offset);
        }
        Ok(())
    }

    fn push_chunk(&mut self) -> Result<(), ArchiveError> {
        self.chunks
            .try_reserve(1)
            .map_err(|_| AllocError { requested: std::mem::size_of::<Chunk>() })?;
        let chunk = Chunk::try_new()?;
        self.chunks.push(chunk);
        tracing::trace!(chunks = self.chunks.len(), "message grew");
        Ok(())
    }

    /// Serialize `value` into the message and return the message for
    /// chaining.
    ///
    /// ```
    /// # use archive_core::WriteMessage;
    /// let mut msg = WriteMessage::new();
    /// msg.write(&7u32)?.write(&true)?.write(&-1i16)?;
    /// assert_eq!(msg.len(), 7);
    /// # Ok::<(), archive_core::ArchiveError>(())
    /// ```
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<&mut Self, ArchiveError> {
        value.serialize(self)?;
        Ok(self)
    }

    /// Append the in-memory bytes of a fixed-layout record.
    pub fn append_pod<T: AsBytes + ?Sized>(&mut self, value: &T) -> Result<(), ArchiveError> {
        self.append(value.as_bytes())
    }

    /// Read-only view of the chain, in wire order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Valid region of each chunk, in wire order.
    pub fn iter_bytes(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.chunks.iter().map(Chunk::as_bytes)
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Total number of valid bytes across all chunks.
    pub fn len(&self) -> usize {
        match self.chunks.split_last() {
            Some((tail, full)) => full.len() * CHUNK_SIZE + tail.len(),
            None => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Failure recorded by the `<<` operator, if any.
    pub fn error(&self) -> Option<&ArchiveError> {
        self.error.as_ref()
    }

    /// Remove and return the failure recorded by the `<<` operator.
    pub fn take_error(&mut self) -> Option<ArchiveError> {
        self.error.take()
    }

    pub(crate) fn record_error(&mut self, err: ArchiveError) {
        if self.error.is_none() {
            tracing::debug!(error = %err, "serialization failed, skipping remaining values");
            self.error = Some(err);
        }
    }

    /// Hand the whole chain over to a transport.
    pub fn into_chunks(self) -> Vec<Chunk> {
        self.chunks
    }

    /// Copy the payload into one contiguous buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.len());
        for part in self.iter_bytes() {
            out.extend_from_slice(part);
        }
        out.freeze()
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Failures surfaced while building or sending a message.
///
/// Nothing at this layer retries; the caller picks retry, abort or
/// escalation.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The sink failed while chunk `chunk` was being written. Earlier chunks
    /// may already be on the transport.
    #[error("stream failed writing chunk {chunk}: {source}")]
    Stream {
        chunk: usize,
        #[source]
        source: StreamError,
    },

    /// A stream failed outside of a chunk transfer.
    #[error(transparent)]
    Io(#[from] StreamError),

    /// A chunk could not be allocated.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(#[from] AllocError),
}

impl ArchiveError {
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, ArchiveError::ResourceExhausted(_))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
