//! Error types shared by the backend client, the data cache and the chart layer.

use thiserror::Error;
use time::Date;

use crate::data::DisplayMode;

/// Failures talking to the JSON backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, TLS, ...)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Body could not be decoded into the expected shape
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Problems found while ingesting a price series
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataError {
    /// The newest record has no usable close price
    #[error("latest close for {symbol} on {date} is missing or not numeric")]
    MalformedClose { symbol: String, date: Date },

    /// Nothing left after dropping unusable records
    #[error("no price data available for {symbol}")]
    EmptySeries { symbol: String },
}

/// Chart widget construction failures
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChartError {
    #[error("{0:?} chart is not available")]
    Unavailable(DisplayMode),
    #[error("chart area {width}x{height} is too small")]
    TooSmall { width: u16, height: u16 },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid ticker symbol: {0:?}")]
pub struct InvalidTicker(pub String);
