//! loggo Manager Library
//!
//! The `loggo` host binary: discovers `loggo-*` plugin executables next to
//! itself and exposes each one as a subcommand.

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod launcher;
pub mod plugins;

pub use error::{LoggoError, LoggoResult};
