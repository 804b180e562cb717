#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Diagnostics primitives for the soar CLI.
//!
//! `diagnostics.rs` holds the user-facing sink (leveled lines and raw result
//! bytes); `init.rs` installs the `tracing` subscriber used for developer logs.

pub mod diagnostics;
pub mod init;

pub use diagnostics::{Capture, Diagnostics, Level};
pub use init::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_ENV_VAR, LogFormat, LoggingConfig, init_logging, level_for,
};
