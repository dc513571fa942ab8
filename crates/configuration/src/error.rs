use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from file: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    #[error("Failed to read the ticker reference table '{path}': {source}")]
    TickerTable {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed ticker reference table '{0}' at line {1}")]
    MalformedTickerTable(String, usize),
}
