//! # mcpi-core
//!
//! Core types for the Minecraft Pi line protocol.
//!
//! This crate provides:
//! - The error taxonomy shared by every mcpi crate
//! - Command argument values and flattening
//! - Request line encoding

pub mod command;
pub mod error;
pub mod value;

pub use command::{encode_command, is_quiet, to_ascii_bytes};
pub use error::{McpiError, Result};
pub use value::{Value, flatten};
