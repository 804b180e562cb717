//! Presence-gated overrides applied on top of a loaded configuration.
//!
//! Each field is `Some` only when the user explicitly supplied it (flag or
//! environment variable). A `None` never touches the loaded value, so a flag's
//! zero value cannot clobber configuration from disk.

use crate::model::{Config, LogOptions};

/// Explicitly supplied configuration values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagOverrides {
    /// Application API base URL.
    pub application_url: Option<String>,
    /// Application API key.
    pub application_key: Option<String>,
    /// Client API base URL.
    pub client_url: Option<String>,
    /// Client API key.
    pub client_key: Option<String>,
    /// Envelope stripping.
    pub parse_body: Option<bool>,
    /// Indented output.
    pub parse_indent: Option<bool>,
    /// Colored diagnostics.
    pub use_color: Option<bool>,
    /// Debug diagnostics.
    pub use_debug: Option<bool>,
    /// Quiet diagnostics.
    pub quiet: Option<bool>,
}

impl FlagOverrides {
    /// Overwrite every explicitly set field in `config`. Returns how many fields were applied.
    pub fn apply(&self, config: &mut Config) -> usize {
        let mut applied = 0;
        assign(&mut config.application.url, self.application_url.as_ref(), &mut applied);
        assign(&mut config.application.key, self.application_key.as_ref(), &mut applied);
        assign(&mut config.client.url, self.client_url.as_ref(), &mut applied);
        assign(&mut config.client.key, self.client_key.as_ref(), &mut applied);
        assign(&mut config.http.parse_body, self.parse_body.as_ref(), &mut applied);
        assign(&mut config.http.parse_indent, self.parse_indent.as_ref(), &mut applied);
        assign(&mut config.logs.use_color, self.use_color.as_ref(), &mut applied);
        assign(&mut config.logs.use_debug, self.use_debug.as_ref(), &mut applied);
        assign(&mut config.logs.quiet, self.quiet.as_ref(), &mut applied);
        applied
    }

    /// Log options derived from overrides alone, for reporting before a configuration exists.
    #[must_use]
    pub fn log_options(&self) -> LogOptions {
        let mut logs = LogOptions::default();
        let mut applied = 0;
        assign(&mut logs.use_color, self.use_color.as_ref(), &mut applied);
        assign(&mut logs.use_debug, self.use_debug.as_ref(), &mut applied);
        assign(&mut logs.quiet, self.quiet.as_ref(), &mut applied);
        logs
    }
}

fn assign<T: Clone>(target: &mut T, value: Option<&T>, applied: &mut usize) {
    if let Some(value) = value {
        target.clone_from(value);
        *applied += 1;
    }
}
