//! CLI command modules.

pub mod config;
pub mod dump;
pub mod encode;
pub mod record;
