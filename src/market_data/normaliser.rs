// Convert wire objects into validated MarketRecords.
// Policy: a body that is not a JSON array fails the whole fetch; a single bad
// entry is dropped, logged and counted.

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, warn};

use crate::engine::types::MarketRecord;
use crate::market_data::adapters::coingecko_types::CoinMarket;
use crate::telemetry;

#[derive(Debug, Error, PartialEq)]
pub enum RecordIssue {
    #[error("entry is not an object of the expected shape")]
    Shape,
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("field `{field}` is negative ({value})")]
    Negative { field: &'static str, value: f64 },
    #[error("duplicate id `{0}`")]
    DuplicateId(String),
}

pub struct Normaliser {
    seen_ids: HashSet<String>,
    dropped: usize,
}

impl Normaliser {
    pub fn new() -> Self {
        Self { seen_ids: HashSet::new(), dropped: 0 }
    }

    /// Parse a response body into records, dropping invalid entries.
    pub fn parse_body(&mut self, body: &str) -> Result<Vec<MarketRecord>, serde_json::Error> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(body)?;
        let total = entries.len();
        let records: Vec<MarketRecord> = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match self.normalise_entry(entry) {
                Ok(record) => Some(record),
                Err(issue) => {
                    warn!(index, %issue, "Dropping market entry");
                    self.dropped += 1;
                    telemetry::record_dropped_entry(&issue);
                    None
                }
            })
            .collect();
        debug!(total, kept = records.len(), dropped = self.dropped, "Normalised market entries");
        Ok(records)
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    fn normalise_entry(&mut self, entry: serde_json::Value) -> Result<MarketRecord, RecordIssue> {
        let raw: CoinMarket = serde_json::from_value(entry).map_err(|_| RecordIssue::Shape)?;
        let record = to_record(raw)?;
        if !self.seen_ids.insert(record.id.clone()) {
            return Err(RecordIssue::DuplicateId(record.id));
        }
        Ok(record)
    }
}

impl Default for Normaliser {
    fn default() -> Self {
        Self::new()
    }
}

fn to_record(raw: CoinMarket) -> Result<MarketRecord, RecordIssue> {
    Ok(MarketRecord {
        id: required(raw.id, "id")?,
        name: required(raw.name, "name")?,
        symbol: required(raw.symbol, "symbol")?,
        image_url: required(raw.image, "image")?,
        current_price: non_negative(raw.current_price, "current_price")?,
        total_volume: non_negative(raw.total_volume, "total_volume")?,
        market_cap: non_negative(raw.market_cap, "market_cap")?,
        price_change_percentage_24h: raw.price_change_percentage_24h,
    })
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, RecordIssue> {
    value.ok_or(RecordIssue::MissingField(field))
}

fn non_negative(value: Option<f64>, field: &'static str) -> Result<f64, RecordIssue> {
    let value = required(value, field)?;
    if value < 0.0 {
        return Err(RecordIssue::Negative { field, value });
    }
    Ok(value)
}
