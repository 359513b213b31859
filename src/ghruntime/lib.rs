//! # gh-runtime Architecture
//!
//! gh-runtime creates, deploys, inspects and deletes remote runtime apps through a
//! REST backend. The library holds everything except terminal I/O; the binary is
//! a thin client on top of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, renders results, sets up logging       │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - RuntimeApi<C: RemoteClient> facade                       │
//! │  - Carries the client and the working directory             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - create, delete, deploy, get, init                        │
//! │  - Built on resolve.rs (which app?) and bundle.rs (zip)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Transport Layer (client/)                                  │
//! │  - RemoteClient trait                                       │
//! │  - HttpClient (production), MemoryClient (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Deploy Pipeline
//!
//! The interesting part of the crate. A deploy resolves the target app
//! ([`resolve`]), zips the source directory into a deterministic archive
//! ([`bundle`]), uploads the bytes and always removes the archive afterwards
//! ([`commands::deploy`]).
//!
//! ## Testing Strategy
//!
//! 1. **Core and commands**: unit tests against real temp directories and
//!    [`client::memory::MemoryClient`]. This is where most tests live.
//! 2. **API**: dispatch tests, checking the right request goes out.
//! 3. **CLI**: `tests/` runs the binary with `assert_cmd` for argument handling,
//!    exit codes and the paths that fail before any network call.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`resolve`]: App identity resolution
//! - [`bundle`]: Directory walking and zip writing
//! - [`client`]: Remote API abstraction and implementations
//! - [`config`]: `runtime.config.json` and client settings
//! - [`error`]: Error types

pub mod api;
pub mod bundle;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod resolve;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
