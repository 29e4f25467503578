//! Tracing output for spec runs.
//!
//! Spec runs execute inside a libtest binary, so events go through libtest's
//! capturing writer: they appear next to the output of the example that
//! produced them and stay hidden for passing tests.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use sprout_config::{Config, LogFormat};

static INSTALLED: OnceCell<LogFormat> = OnceCell::new();

/// Errors raised while installing the spec-run subscriber.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The configured filter expression does not parse.
    #[error("invalid log filter '{filter}': {source}")]
    InvalidFilter {
        /// Expression taken from the configuration.
        filter: String,
        /// Parser diagnostic.
        #[source]
        source: ParseError,
    },
    /// A global subscriber was installed by someone else first.
    #[error("a tracing subscriber is already installed")]
    AlreadyInstalled(#[from] TryInitError),
}

/// Installs the spec-run subscriber once per process.
///
/// Later calls are no-ops and report the format chosen by the first one.
///
/// # Errors
///
/// Returns [`TelemetryError::InvalidFilter`] for an unparsable filter, or
/// [`TelemetryError::AlreadyInstalled`] when the host installed its own
/// global subscriber.
pub fn initialise(config: &Config) -> Result<LogFormat, TelemetryError> {
    INSTALLED.get_or_try_init(|| install(config)).copied()
}

fn filter_for(config: &Config) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_new(config.log_filter()).map_err(|source| TelemetryError::InvalidFilter {
        filter: config.log_filter().to_owned(),
        source,
    })
}

fn install(config: &Config) -> Result<LogFormat, TelemetryError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_for(config)?)
        .with_target(true)
        .with_test_writer()
        .with_ansi(false)
        .with_timer(UtcTime::rfc_3339());

    match config.log_format() {
        LogFormat::Json => builder.json().flatten_event(true).finish().try_init()?,
        LogFormat::Compact => builder.compact().finish().try_init()?,
    }
    Ok(config.log_format())
}
