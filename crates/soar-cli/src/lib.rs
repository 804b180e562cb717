#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::redundant_pub_crate)]

//! Command-line client for a game-server panel's application and client APIs.
//!
//! Layout:
//! - `cli.rs`: argument parsing, command dispatch, and exit codes
//! - `commands/`: command handlers grouped by resource
//! - `client.rs`: invocation context, request helper, and CLI errors
//! - `query.rs`: path segment and query-string assembly
//! - `output.rs`: normalized result rendering
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod query;

#[cfg(test)]
pub(crate) mod harness;

pub use cli::run;
