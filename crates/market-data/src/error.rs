use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Failed to execute the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The chart endpoint returned an error: {0}")]
    Provider(String),

    #[error("Failed to deserialize the chart response: {0}")]
    Deserialization(String),

    #[error("Invalid data format from provider: {0}")]
    InvalidData(String),
}
