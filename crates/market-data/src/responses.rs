use serde::Deserialize;

// The chart endpoint wraps everything in a `chart` envelope with either a
// `result` array or an `error` object. Only the fields we consume are
// modeled; unknown fields are ignored by serde.

/// The top-level envelope of a `GET /v8/finance/chart/{symbol}` response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartEnvelope,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartEnvelope {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartErrorResponse>,
}

/// One chart result: parallel arrays of unix timestamps and indicator values.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: ChartIndicators,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChartIndicators {
    /// Present for daily ranges; each entry's `adjclose` array is parallel
    /// to `timestamp`, with `null` holes on non-traded days.
    #[serde(default)]
    pub adjclose: Vec<AdjCloseBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdjCloseBlock {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

/// Represents an error response from the chart endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartErrorResponse {
    pub code: String,
    pub description: String,
}
