//! Discovery and loading of persisted configuration files.
//!
//! # Design
//! - The local source is project-scoped (`.soar-local.yml` in the working directory).
//! - The global source is user-scoped (`$SOAR_PATH/config.yml`, else `~/.soar/config.yml`).
//! - Nothing here creates or rewrites files.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{Config, EffectiveConfig};
use crate::overrides::FlagOverrides;

/// File name of the project-scoped configuration.
pub const LOCAL_CONFIG_FILE: &str = ".soar-local.yml";

/// File name of the user-scoped configuration.
pub const GLOBAL_CONFIG_FILE: &str = "config.yml";

/// Directory under the home directory holding the user-scoped configuration.
pub const GLOBAL_CONFIG_DIR: &str = ".soar";

/// Environment variable overriding the user-scoped configuration directory.
pub const CONFIG_PATH_ENV_VAR: &str = "SOAR_PATH";

/// Which configuration source to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// Project-scoped file in the working directory.
    Local,
    /// User-scoped file.
    Global,
}

impl ConfigScope {
    /// Map the `--local` flag onto a scope.
    #[must_use]
    pub const fn from_local_flag(local: bool) -> Self {
        if local { Self::Local } else { Self::Global }
    }

    /// Label used in logs and `config info` output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Global => "global",
        }
    }
}

/// Resolves configuration file locations for each scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigLocator {
    working_dir: PathBuf,
    global_dir: Option<PathBuf>,
}

impl ConfigLocator {
    /// Build a locator from explicit directories.
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            global_dir,
        }
    }

    /// Build a locator from the process working directory, `SOAR_PATH`, and the home directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the working directory cannot be determined.
    pub fn from_env() -> ConfigResult<Self> {
        let working_dir = env::current_dir().map_err(|source| ConfigError::Io {
            operation: "config.current_dir",
            path: PathBuf::from("."),
            source,
        })?;
        let global_dir = global_dir_from(env::var_os(CONFIG_PATH_ENV_VAR), dirs::home_dir());
        Ok(Self::new(working_dir, global_dir))
    }

    /// Path of the configuration file for `scope`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] for the global scope when no home
    /// directory or `SOAR_PATH` is available.
    pub fn path_for(&self, scope: ConfigScope) -> ConfigResult<PathBuf> {
        match scope {
            ConfigScope::Local => Ok(self.working_dir.join(LOCAL_CONFIG_FILE)),
            ConfigScope::Global => self
                .global_dir
                .as_ref()
                .map(|dir| dir.join(GLOBAL_CONFIG_FILE))
                .ok_or_else(|| ConfigError::NotFound {
                    path: Path::new("~")
                        .join(GLOBAL_CONFIG_DIR)
                        .join(GLOBAL_CONFIG_FILE),
                }),
        }
    }
}

fn global_dir_from(soar_path: Option<OsString>, home: Option<PathBuf>) -> Option<PathBuf> {
    soar_path
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .or_else(|| home.map(|home| home.join(GLOBAL_CONFIG_DIR)))
}

/// Read and parse a configuration document.
///
/// An empty file yields the default document.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] when the file does not exist,
/// [`ConfigError::Parse`] for malformed YAML, and [`ConfigError::Io`] for other
/// read failures.
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(ConfigError::Io {
                operation: "config.read",
                path: path.to_path_buf(),
                source,
            });
        }
    };

    if contents.trim().is_empty() {
        return Ok(Config::default());
    }

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the configuration for `scope` and apply explicitly set overrides on top.
///
/// # Errors
///
/// Propagates discovery and loading failures from [`ConfigLocator::path_for`]
/// and [`load_config`].
pub fn resolve(
    locator: &ConfigLocator,
    scope: ConfigScope,
    overrides: &FlagOverrides,
) -> ConfigResult<EffectiveConfig> {
    let path = locator.path_for(scope)?;
    debug!(scope = scope.as_str(), path = %path.display(), "loading configuration");

    let mut config = load_config(&path)?;
    let applied = overrides.apply(&mut config);
    debug!(applied, "applied command-line overrides");

    Ok(EffectiveConfig::new(config, path))
}
