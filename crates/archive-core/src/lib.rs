//! archive-core — chunked message building, byte-stream endpoints, and
//! native-order serialization.
//!
//! Values are serialized into a [`WriteMessage`], which accumulates bytes in
//! fixed-size [`Chunk`]s. A finished message is handed to a [`ByteSink`] in a
//! single [`send_message`] call, one `write` per chunk.

pub mod chunk;
pub mod config;
pub mod flush;
pub mod message;
pub mod serialize;
pub mod stream;

pub use chunk::{AllocError, Chunk, CHUNK_SIZE};
pub use flush::{send_message, send_message_with, FlushStats};
pub use message::{ArchiveError, WriteMessage};
pub use serialize::Serialize;
pub use stream::{read_full, ByteSink, ByteSource, IoSink, IoSource, StreamError};
