//! Invocation context, request helper, and CLI error types.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use anyhow::anyhow;
use soar_api::{BuildError, Executor, Failure, Method, NormalizeError, ResponseBody, build};
use soar_config::{ConfigError, ConfigLocator, ConfigScope, EffectiveConfig, Surface, resolve};

use crate::cli::GlobalArgs;

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.display_message())
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::validation(format!("{:#}", anyhow!(err)))
    }
}

impl From<BuildError> for CliError {
    fn from(err: BuildError) -> Self {
        Self::validation(format!("{:#}", anyhow!(err)))
    }
}

impl From<Failure> for CliError {
    fn from(err: Failure) -> Self {
        Self::failure(err)
    }
}

impl From<NormalizeError> for CliError {
    fn from(err: NormalizeError) -> Self {
        Self::failure(err)
    }
}

/// Resolved configuration and transport shared by command handlers.
pub(crate) struct AppContext {
    pub(crate) config: EffectiveConfig,
    executor: Executor,
}

impl AppContext {
    /// Resolve configuration for the selected scope and build the transport.
    pub(crate) fn prepare(
        locator: &ConfigLocator,
        globals: &GlobalArgs,
        request_id: &str,
    ) -> CliResult<Self> {
        let scope = ConfigScope::from_local_flag(globals.local);
        let config = resolve(locator, scope, &globals.overrides())?;
        let executor = Executor::new(request_id, globals.timeout.map(Duration::from_secs))
            .map_err(CliError::failure)?;
        Ok(Self { config, executor })
    }

    /// Build and execute one request against `surface`.
    pub(crate) fn send(
        &self,
        surface: Surface,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> CliResult<ResponseBody> {
        let request = build(&self.config.credentials(surface), method, path, body)?;
        Ok(self.executor.execute(request)?)
    }
}
