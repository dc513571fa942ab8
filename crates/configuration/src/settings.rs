use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::PORTFOLIO_SYMBOL;
use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub defaults: DefaultRange,
}

/// Contains parameters for the market-data retrieval layer.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// The provider symbol for the benchmark index (e.g., "^BVSP").
    pub benchmark_source_symbol: String,
    /// The market suffix appended to bare tickers for retrieval and
    /// stripped again from returned column labels (e.g., ".SA").
    pub ticker_suffix: String,
    /// Path to the ticker reference table (symbol,name CSV).
    pub tickers_file: String,
    /// Base URL of the chart endpoint.
    pub endpoint: String,
}

/// The default analysis window used when the caller does not supply one.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultRange {
    /// The default start date for the analysis period.
    pub start_date: NaiveDate,
    /// The default end date; `None` means "today" at invocation time.
    pub end_date: Option<NaiveDate>,
}

impl Config {
    /// Sanity checks that cannot be expressed in the type system.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data.benchmark_source_symbol.is_empty() {
            return Err(ConfigError::ValidationError(
                "data.benchmark_source_symbol must not be empty".to_string(),
            ));
        }

        // The benchmark lands in the matrix under the reserved symbol; a
        // source symbol equal to the portfolio label would collide later.
        if self.data.benchmark_source_symbol == PORTFOLIO_SYMBOL {
            return Err(ConfigError::ValidationError(format!(
                "data.benchmark_source_symbol must not be the reserved symbol '{}'",
                PORTFOLIO_SYMBOL
            )));
        }

        if let Some(end) = self.defaults.end_date {
            if self.defaults.start_date > end {
                return Err(ConfigError::ValidationError(format!(
                    "defaults.start_date {} is after defaults.end_date {}",
                    self.defaults.start_date, end
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start: NaiveDate, end: Option<NaiveDate>) -> Config {
        Config {
            data: DataConfig {
                benchmark_source_symbol: "^BVSP".to_string(),
                ticker_suffix: ".SA".to_string(),
                tickers_file: "tickers_ibra.csv".to_string(),
                endpoint: "https://query1.finance.yahoo.com".to_string(),
            },
            defaults: DefaultRange { start_date: start, end_date: end },
        }
    }

    #[test]
    fn validate_accepts_open_ended_range() {
        let cfg = config(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap(), None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_range() {
        let cfg = config(
            NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            Some(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()),
        );
        assert!(cfg.validate().is_err());
    }
}
