#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! File-backed configuration for the soar CLI.
//!
//! Layout: `model.rs` (persisted document and merged view), `loader.rs`
//! (local/global discovery and YAML loading), `overrides.rs` (presence-gated
//! command-line overrides), `error.rs` (error taxonomy).

pub mod error;
pub mod loader;
pub mod model;
pub mod overrides;

pub use error::{ConfigError, ConfigResult};
pub use loader::{
    CONFIG_PATH_ENV_VAR, ConfigLocator, ConfigScope, GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILE,
    LOCAL_CONFIG_FILE, load_config, resolve,
};
pub use model::{
    Config, EffectiveConfig, EndpointCredentials, HttpOptions, LogOptions, Surface, SurfaceConfig,
};
pub use overrides::FlagOverrides;
