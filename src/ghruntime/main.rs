//! # gh-runtime CLI
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, and this file only
//! invokes `cli::run()` and maps the outcome to an exit code. Every error ends
//! the process with status 1 and `Error: <message>` on stderr.
//!
//! See the library crate docs for the layering behind the CLI.

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
