// Shared trait + error for market data sources

use thiserror::Error;

use crate::engine::types::MarketRecord;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{url} answered with HTTP {status}")]
    Status { status: u16, url: String },

    #[error("malformed market data: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    // Short label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Client(_) => "client",
            FetchError::Transport(_) => "transport",
            FetchError::Status { .. } => "status",
            FetchError::Parse(_) => "parse",
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// A remote source of market snapshots.
///
/// Each call performs exactly one outbound request and never retries.
#[async_trait::async_trait]
pub trait MarketSource: Send + Sync {
    async fn fetch_top_markets(&self) -> FetchResult<Vec<MarketRecord>>;
}

pub mod coingecko;
pub mod coingecko_types;
