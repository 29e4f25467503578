//! Shared configuration for the sprout example engine.
//!
//! Configuration is layered by `ortho_config`: built-in defaults, then an
//! optional `.sprout.toml`, then `SPROUT_*` environment variables, then
//! command-line flags when a host passes its arguments through. The engine
//! itself only consumes two knobs: the tracing filter and format used by the
//! telemetry subscriber, and the separator placed between descriptions when
//! an example's display name is built.
//!
//! | Variable | Flag | Default | Meaning |
//! |---|---|---|---|
//! | `SPROUT_LOG_FILTER` | `--log-filter` | `warn` | `EnvFilter` expression |
//! | `SPROUT_LOG_FORMAT` | `--log-format` | `compact` | `json` or `compact` |
//! | `SPROUT_NAME_SEPARATOR` | `--name-separator` | `" "` | joins group and example descriptions |

mod defaults;
mod logging;

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_NAME_SEPARATOR, LOG_FILTER_VAR, LOG_FORMAT_VAR,
    NAME_SEPARATOR_VAR, default_log_filter, default_log_format, default_name_separator,
};
pub use logging::{LogFormat, LogFormatParseError};

/// Program name handed to the loader when no arguments are forwarded.
const PROGRAM_NAME: &str = "sprout";

/// Errors raised while loading or adjusting configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One of the configuration layers could not be read or merged.
    #[error("failed to load configuration: {0}")]
    Load(#[source] Arc<OrthoError>),

    /// The name separator resolved to an empty string.
    #[error("{variable} must not be empty")]
    EmptySeparator {
        /// Variable that names the setting.
        variable: &'static str,
    },
}

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SPROUT")]
pub struct Config {
    /// Tracing filter expression.
    #[ortho_config(default = default_log_filter().to_owned())]
    log_filter: String,
    /// Tracing output format.
    #[ortho_config(default = default_log_format())]
    log_format: LogFormat,
    /// Separator joining descriptions in example display names.
    #[ortho_config(default = default_name_separator().to_owned())]
    name_separator: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter().to_owned(),
            log_format: default_log_format(),
            name_separator: default_name_separator().to_owned(),
        }
    }
}

impl Config {
    /// Loads configuration from defaults, configuration files and the
    /// process environment, ignoring the process arguments.
    ///
    /// Test binaries receive libtest's own flags, so the engine never
    /// forwards them to the loader.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer fails to parse, or
    /// [`ConfigError::EmptySeparator`] when the separator resolves to `""`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_args([OsString::from(PROGRAM_NAME)])
    }

    /// Loads configuration with `args` as the command-line layer.
    ///
    /// The first item is the program name, as with [`std::env::args_os`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] when a layer fails to parse, or
    /// [`ConfigError::EmptySeparator`] when the separator resolves to `""`.
    pub fn from_args<I, A>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString> + Clone,
    {
        Self::load_from_iter(args)
            .map_err(ConfigError::Load)?
            .validated()
    }

    /// Returns a copy with the given log filter.
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// Returns a copy with the given log format.
    #[must_use]
    pub const fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// Returns a copy with the given name separator.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySeparator`] when `separator` is empty,
    /// since display names would otherwise run together.
    pub fn with_name_separator(
        mut self,
        separator: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        self.name_separator = separator.into();
        self.validated()
    }

    /// Tracing filter expression.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    /// Tracing output format.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Separator joining descriptions in example display names.
    #[must_use]
    pub fn name_separator(&self) -> &str {
        &self.name_separator
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.name_separator.is_empty() {
            return Err(ConfigError::EmptySeparator {
                variable: NAME_SEPARATOR_VAR,
            });
        }
        Ok(self)
    }
}
