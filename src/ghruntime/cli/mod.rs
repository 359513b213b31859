//! # CLI Layer
//!
//! This module is **one possible UI client** for the library, not the
//! application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Installs the logging subscriber
//! - Formats output for human consumption
//!
//! ## Module Structure
//!
//! - `setup`: Argument parsing via clap, version string
//! - `commands`: Context setup and per-command handlers
//! - `render`: Message and detail formatting

mod commands;
mod render;
pub mod setup;

pub use commands::run;
