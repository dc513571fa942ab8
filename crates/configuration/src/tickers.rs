use crate::error::ConfigError;
use serde::Serialize;
use std::path::Path;

/// One row of the ticker reference table: a bare exchange symbol and the
/// company name shown in selection UIs. The table is a static resource
/// shipped next to `config.toml`, not part of the analytics contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TickerInfo {
    pub symbol: String,
    pub name: String,
}

/// Loads the `symbol,name` CSV reference table.
///
/// The first line is treated as a header and skipped. Blank lines are
/// ignored; a data line without a comma is a hard error since a silently
/// dropped row would make a ticker unselectable.
pub fn load_ticker_reference(path: impl AsRef<Path>) -> Result<Vec<TickerInfo>, ConfigError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::TickerTable {
        path: path.display().to_string(),
        source,
    })?;

    let mut tickers = Vec::new();
    for (index, line) in raw.lines().enumerate().skip(1) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (symbol, name) = line
            .split_once(',')
            .ok_or_else(|| {
                ConfigError::MalformedTickerTable(path.display().to_string(), index + 1)
            })?;

        tickers.push(TickerInfo {
            symbol: symbol.trim().to_string(),
            name: name.trim().to_string(),
        });
    }

    Ok(tickers)
}
