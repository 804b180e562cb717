//! Typed configuration models.
//!
//! # Design
//! - `Config` mirrors the persisted YAML document; every field is optional on disk.
//! - `EffectiveConfig` is the merged, read-only view handed to commands.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// API personality exposed by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Operator-level API under `/api/application`.
    Application,
    /// End-user API under `/api/client`.
    Client,
}

impl Surface {
    /// Lowercase label used in configuration keys and messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Client => "client",
        }
    }
}

impl Display for Surface {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Panel location and API key for one surface, as stored on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Base URL of the panel, without the `/api/...` suffix.
    pub url: String,
    /// API key sent as a bearer token.
    pub key: String,
}

/// Response handling switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpOptions {
    /// Strip the response envelope and print only the resource payload.
    pub parse_body: bool,
    /// Pretty-print output with two-space indentation.
    pub parse_indent: bool,
}

/// Diagnostics switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogOptions {
    /// Emit ANSI colors in diagnostic prefixes.
    pub use_color: bool,
    /// Emit debug-level diagnostics.
    pub use_debug: bool,
    /// Suppress informational diagnostics.
    pub quiet: bool,
}

/// Configuration document as persisted in `config.yml` or `.soar-local.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application API connection.
    pub application: SurfaceConfig,
    /// Client API connection.
    pub client: SurfaceConfig,
    /// Response handling defaults.
    pub http: HttpOptions,
    /// Diagnostics defaults.
    pub logs: LogOptions,
}

impl Config {
    /// Borrow the stored connection for a surface.
    #[must_use]
    pub const fn surface(&self, surface: Surface) -> &SurfaceConfig {
        match surface {
            Surface::Application => &self.application,
            Surface::Client => &self.client,
        }
    }
}

/// Base URL and token bound to one surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCredentials {
    /// Surface these credentials authenticate against.
    pub surface: Surface,
    /// Panel base URL.
    pub base_url: String,
    /// Bearer token.
    pub token: String,
}

impl EndpointCredentials {
    /// Whether both the base URL and the token are non-empty.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.base_url.trim().is_empty() && !self.token.trim().is_empty()
    }
}

/// Merged configuration for a single invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    config: Config,
    source: PathBuf,
}

impl EffectiveConfig {
    /// Wrap a fully merged document together with the file it came from.
    #[must_use]
    pub fn new(config: Config, source: impl Into<PathBuf>) -> Self {
        Self {
            config,
            source: source.into(),
        }
    }

    /// Credentials view for the requested surface.
    #[must_use]
    pub fn credentials(&self, surface: Surface) -> EndpointCredentials {
        let stored = self.config.surface(surface);
        EndpointCredentials {
            surface,
            base_url: stored.url.clone(),
            token: stored.key.clone(),
        }
    }

    /// Response handling options.
    #[must_use]
    pub const fn http(&self) -> HttpOptions {
        self.config.http
    }

    /// Diagnostics options.
    #[must_use]
    pub const fn logs(&self) -> LogOptions {
        self.config.logs
    }

    /// File the base configuration was loaded from.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Underlying merged document.
    #[must_use]
    pub const fn document(&self) -> &Config {
        &self.config
    }
}
