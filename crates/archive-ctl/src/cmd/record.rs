//! Record files — a TOML list of typed fields to encode.
//!
//! ```toml
//! [[field]]
//! type = "u32"
//! value = 7
//!
//! [[field]]
//! type = "bytes"
//! value = "deadbeef"
//! ```
//!
//! TOML integers are signed 64-bit, so a `u64` value may also be written as
//! a string, decimal or `0x` hex: `value = "0xffffffffffffffff"`.

use std::fmt;

use anyhow::{Context, Result};
use serde::de::{self, Deserializer, Visitor};
use serde::Deserialize;

use archive_core::{ArchiveError, Serialize, WriteMessage};

#[derive(Debug, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub field: Vec<Field>,
}

/// One typed value. Encoded with the primitive codec for its type; `bytes`
/// are appended raw.
#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Field {
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(#[serde(deserialize_with = "deserialize_u64")] u64),
    F32(f32),
    F64(f64),
    Bool(bool),
    Bytes(#[serde(deserialize_with = "hex::deserialize")] Vec<u8>),
}

/// Accepts a non-negative integer or a decimal / `0x` hex string.
fn deserialize_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    struct U64Visitor;

    impl<'de> Visitor<'de> for U64Visitor {
        type Value = u64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a non-negative integer or a decimal/hex string")
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<u64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<u64, E> {
            u64::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<u64, E> {
            let s = v.trim();
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse(),
            };
            parsed.map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
        }
    }

    deserializer.deserialize_any(U64Visitor)
}

impl Serialize for Field {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        match self {
            Field::I8(v) => v.serialize(msg),
            Field::U8(v) => v.serialize(msg),
            Field::I16(v) => v.serialize(msg),
            Field::U16(v) => v.serialize(msg),
            Field::I32(v) => v.serialize(msg),
            Field::U32(v) => v.serialize(msg),
            Field::I64(v) => v.serialize(msg),
            Field::U64(v) => v.serialize(msg),
            Field::F32(v) => v.serialize(msg),
            Field::F64(v) => v.serialize(msg),
            Field::Bool(v) => v.serialize(msg),
            Field::Bytes(v) => msg.append(v),
        }
    }
}

impl Serialize for Record {
    fn serialize(&self, msg: &mut WriteMessage) -> Result<(), ArchiveError> {
        self.field.serialize(msg)
    }
}

impl Record {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid record file")
    }

    pub fn load(path: &str) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read record file: {}", path))?;
        Self::parse(&text).with_context(|| format!("in {}", path))
    }
}
