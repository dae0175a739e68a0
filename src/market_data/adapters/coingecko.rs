// CoinGecko /coins/markets adapter: one GET per call, no retries, default timeouts

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use super::coingecko_types::markets_query;
use super::{FetchError, FetchResult, MarketSource};
use crate::config::ApiSettings;
use crate::engine::types::MarketRecord;
use crate::market_data::normaliser::Normaliser;

const API_KEY_HEADER: &str = "x-cg-demo-api-key";
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub struct CoinGeckoAdapter {
    client: Client,
    markets_url: String, // e.g. "https://api.coingecko.com/api/v3/coins/markets"
}

impl CoinGeckoAdapter {
    pub fn new(settings: &ApiSettings) -> FetchResult<Self> {
        Ok(Self {
            client: build_client(USER_AGENT, settings.api_key.as_deref())?,
            markets_url: format!("{}/coins/markets", settings.base_url.trim_end_matches('/')),
        })
    }

    pub fn markets_url(&self) -> &str {
        &self.markets_url
    }
}

// Builder failures are local misconfiguration, never a network problem
fn build_client(user_agent: &str, api_key: Option<&str>) -> FetchResult<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    if let Some(key) = api_key.filter(|k| !k.is_empty()) {
        // an unusable key is skipped rather than failing construction
        match HeaderValue::from_str(key) {
            Ok(value) => {
                headers.insert(API_KEY_HEADER, value);
            }
            Err(e) => warn!(error = %e, "Ignoring API key that is not a valid header value"),
        }
    }

    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers)
        .build()
        .map_err(FetchError::Client)
}

#[async_trait::async_trait]
impl MarketSource for CoinGeckoAdapter {
    #[instrument(skip(self), fields(url = %self.markets_url))]
    async fn fetch_top_markets(&self) -> FetchResult<Vec<MarketRecord>> {
        debug!("Requesting top markets");
        let response = self
            .client
            .get(&self.markets_url)
            .query(&markets_query())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            });
        }

        let body = response.text().await?;
        let mut normaliser = Normaliser::new();
        let records = normaliser.parse_body(&body)?;
        info!(count = records.len(), dropped = normaliser.dropped(), "Fetched top markets");
        Ok(records)
    }
}
