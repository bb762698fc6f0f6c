use thiserror::Error;

/// Reasons a monitor cannot be registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("URL is already being monitored: {0}")]
    DuplicateUrl(String),
}

/// Reasons a monitor cannot be removed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoveError {
    #[error("No monitor registered for {0}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadFailed(#[source] std::io::Error),

    #[error("Failed to write config file: {0}")]
    WriteFailed(#[source] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeFailed(#[from] toml::ser::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidOverride { name: &'static str, value: String },

    #[error("Could not determine a config directory (set XDG_CONFIG_HOME or HOME)")]
    ConfigPathUnavailable,
}
