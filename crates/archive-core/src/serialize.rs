//! Type-driven serialization into a [`WriteMessage`].
//!
//! Any type implementing [`Serialize`] can be written into a message, either
//! through [`WriteMessage::write`] or with the `<<` operator:
//!
//! ```
//! # use archive_core::WriteMessage;
//! let mut msg = WriteMessage::new();
//! let _ = &mut msg << 1u8 << 2u16 << true;
//! assert!(msg.error().is_none());
//! assert_eq!(msg.len(), 4);
//! ```
//!
//! Primitives are written as their raw bit pattern in host byte order, with
//! no tag, no length and no byte-order normalization. Peers on a different
//! architecture must normalize in a higher layer. Composite impls (slices,
//! arrays, tuples) are the plain concatenation of their elements.

use std::ops::Shl;

use zerocopy::AsBytes;

use crate::message::{ArchiveError, WriteMessage};

/// A value that knows how to append its own encoding to a message.
pub trait Serialize {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError>;
}

/// `&mut msg << a << b` serializes `a` then `b`.
///
/// An operator cannot return a `Result`, so the first failure is kept in the
/// message and later values are skipped. Check [`WriteMessage::error`], or let
/// [`send_message`](crate::send_message) report it.
impl<'a, T: Serialize> Shl<T> for &'a mut WriteMessage {
    type Output = &'a mut WriteMessage;

    fn shl(self, value: T) -> Self::Output {
        if self.error().is_none() {
            if let Err(e) = value.serialize(self) {
                self.record_error(e);
            }
        }
        self
    }
}

// ── Primitive codecs ──────────────────────────────────────────────────────────

/// Append `value` as exactly `size_of::<T>()` bytes in host order.
fn append_native<T: AsBytes>(msg: &mut WriteMessage, value: &T) -> Result<(), ArchiveError> {
    msg.append(value.as_bytes())
}

macro_rules! native_width {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Serialize for $ty {
                fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
                    append_native(msg, self)
                }
            }
        )*
    };
}

native_width!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl Serialize for bool {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        append_native(msg, &u8::from(*self))
    }
}

// ── Composites ────────────────────────────────────────────────────────────────

impl<T: Serialize + ?Sized> Serialize for &T {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        (**self).serialize(msg)
    }
}

impl<T: Serialize + ?Sized> Serialize for Box<T> {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        (**self).serialize(msg)
    }
}

impl<T: Serialize> Serialize for [T] {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        self.iter().try_for_each(|item| item.serialize(msg))
    }
}

impl<T: Serialize, const N: usize> Serialize for [T; N] {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        self.as_slice().serialize(msg)
    }
}

impl<T: Serialize> Serialize for Vec<T> {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        self.as_slice().serialize(msg)
    }
}

macro_rules! tuple_impls {
    ($($name:ident)+) => {
        impl<$($name: Serialize),+> Serialize for ($($name,)+) {
            #[allow(non_snake_case)]
            fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
                let ($($name,)+) = self;
                $($name.serialize(msg)?;)+
                Ok(())
            }
        }
    };
}

tuple_impls!(A);
tuple_impls!(A B);
tuple_impls!(A B C);
tuple_impls!(A B C D);

// ── Tests ─────────────────────────────────────────────────────────────────────
