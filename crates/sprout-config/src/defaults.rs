use crate::logging::LogFormat;

/// Default log filter expression applied by the telemetry subscriber.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Separator placed between the descriptions that make up an example name.
pub const DEFAULT_NAME_SEPARATOR: &str = " ";

/// Environment variable overriding the log filter.
pub const LOG_FILTER_VAR: &str = "SPROUT_LOG_FILTER";

/// Environment variable overriding the log format.
pub const LOG_FORMAT_VAR: &str = "SPROUT_LOG_FORMAT";

/// Environment variable overriding the example name separator.
pub const NAME_SEPARATOR_VAR: &str = "SPROUT_NAME_SEPARATOR";

/// Default log filter expression.
#[must_use]
pub const fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Default logging format.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Compact
}

/// Default example name separator.
#[must_use]
pub const fn default_name_separator() -> &'static str {
    DEFAULT_NAME_SEPARATOR
}
