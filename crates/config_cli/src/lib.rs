//! tenant-config CLI library exports.
//!
//! The binary only parses arguments and prints; everything it runs lives
//! here so it can be tested directly.

pub mod commands;
pub mod config;
pub mod errors;
