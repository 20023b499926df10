//! Blocking byte-stream endpoints.
//!
//! [`ByteSource`] is a thin read primitive: short reads are normal and the
//! caller loops (see [`read_full`]). [`ByteSink`] is the opposite: a write
//! either transfers every byte or fails, and short writes are never
//! surfaced.
//!
//! Neither side buffers, retries on failure, or times out.

use std::io::{ErrorKind, Read, Write};

use static_assertions::assert_not_impl_any;

/// Read endpoint.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes. `Ok(0)` means clean end-of-stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError>;
}

/// Write endpoint.
pub trait ByteSink {
    /// Write all of `buf`, blocking until done. Returns `buf.len()`.
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError>;

    /// Drain any buffering the endpoint does in user space.
    ///
    /// This is not a durability barrier: nothing here asks the OS to commit
    /// data to storage (no `fsync`). The default does nothing.
    fn sync(&mut self) -> Result<(), StreamError> {
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        (**self).read(buf)
    }
}

impl<S: ByteSink + ?Sized> ByteSink for &mut S {
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        (**self).write(buf)
    }

    fn sync(&mut self) -> Result<(), StreamError> {
        (**self).sync()
    }
}

impl<S: ByteSink + ?Sized> ByteSink for Box<S> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        (**self).write(buf)
    }

    fn sync(&mut self) -> Result<(), StreamError> {
        (**self).sync()
    }
}

/// In-memory source; each read consumes from the front of the slice.
impl ByteSource for &[u8] {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        let n = buf.len().min(self.len());
        let (head, rest) = self.split_at(n);
        buf[..n].copy_from_slice(head);
        *self = rest;
        Ok(n)
    }
}

/// In-memory sink; never fails.
impl ByteSink for Vec<u8> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }
}

/// Loop on `source` until `buf` is full, the stream ends, or it fails.
///
/// Returns the number of bytes read; less than `buf.len()` only at
/// end-of-stream.
pub fn read_full<S: ByteSource + ?Sized>(
    source: &mut S,
    buf: &mut [u8],
) -> Result<usize, StreamError> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..])? {
            0 => break,
            n => filled += n.min(buf.len() - filled),
        }
    }
    Ok(filled)
}

// ── std::io adapters ──────────────────────────────────────────────────────────

/// [`ByteSource`] over any [`std::io::Read`].
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
}

/// [`ByteSink`] over any [`std::io::Write`].
#[derive(Debug)]
pub struct IoSink<W> {
    inner: W,
}

assert_not_impl_any!(IoSource<std::fs::File>: Clone);
assert_not_impl_any!(IoSink<std::fs::File>: Clone);

impl<R: Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> ByteSource for IoSource<R> {
    /// One underlying `read`. An interrupted call transferred nothing and is
    /// reissued.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, StreamError> {
        loop {
            match Read::read(&mut self.inner, buf) {
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                result => return result.map_err(StreamError::from),
            }
        }
    }
}

impl<W: Write> IoSink<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> ByteSink for IoSink<W> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, StreamError> {
        self.inner.write_all(buf).map_err(|e| match e.kind() {
            ErrorKind::WriteZero | ErrorKind::BrokenPipe => StreamError::Closed,
            _ => StreamError::Io(e),
        })?;
        Ok(buf.len())
    }

    /// Forwards to [`Write::flush`]. For a `File` that hands buffered bytes
    /// to the OS; it does not call `sync_all`.
    fn sync(&mut self) -> Result<(), StreamError> {
        self.inner.flush().map_err(StreamError::from)
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// An endpoint failed. Replaces the negative return sentinel of a raw
/// read/write call.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("stream closed by peer")]
    Closed,

    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },
}

// ── Tests ─────────────────────────────────────────────────────────────────────
