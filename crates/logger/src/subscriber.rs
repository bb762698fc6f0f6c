use std::env::var;
use std::str::FromStr;

use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Initialize tracing at INFO, format taken from RUST_LOG_FORMAT.
pub fn init_tracing() {
    init_tracing_with("info", None);
}

/// Initialize tracing subscriber.
///
/// `RUST_LOG` takes precedence over `default_level`, and `RUST_LOG_FORMAT`
/// over `format`. An unparsable level falls back to INFO.
pub fn init_tracing_with(default_level: &str, format: Option<LogFormat>) {
    let level = LevelFilter::from_str(default_level).unwrap_or(LevelFilter::INFO);
    let env_filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();

    let (log_format, format_error) = match var("RUST_LOG_FORMAT") {
        Ok(raw) => match raw.parse::<LogFormat>() {
            Ok(parsed) => (parsed, None),
            Err(e) => (format.unwrap_or_default(), Some(e)),
        },
        Err(_) => (format.unwrap_or_default(), None),
    };

    let log_layer = match log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().with_filter(env_filter).boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .without_time()
            .with_filter(env_filter)
            .boxed(),
    };

    if tracing_subscriber::registry().with(log_layer).try_init().is_err() {
        return;
    }

    if let Some(error) = format_error {
        warn!("Ignoring RUST_LOG_FORMAT: {error}");
    }
}
