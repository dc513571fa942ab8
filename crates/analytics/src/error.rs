use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error(
        "Column '{0}' has a zero or missing first observation; its normalization is undefined"
    )]
    DegenerateSeries(String),

    #[error("The matrix already carries a portfolio column; it is added exactly once")]
    PortfolioAlreadyPresent,

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
