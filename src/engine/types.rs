use serde::Serialize;

use crate::market_data::adapters::FetchError;

// One asset's snapshot at fetch time, already validated by the normaliser.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketRecord {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image_url: String,
    pub current_price: f64,
    pub total_volume: f64,
    pub market_cap: f64,
    // Absent when the upstream source has no 24h history for the asset
    pub price_change_percentage_24h: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    MarketCap,
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Direction the next activation of a sort button uses.
    /// Unset and ascending both go descending, descending flips to ascending.
    pub fn next(current: Option<SortDirection>) -> SortDirection {
        match current {
            Some(SortDirection::Descending) => SortDirection::Ascending,
            Some(SortDirection::Ascending) | None => SortDirection::Descending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed { reason: String },
}

/// Single source of truth for what the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub records: Vec<MarketRecord>,
    pub search_term: String,
    pub market_cap_sort: Option<SortDirection>,
    pub change_sort: Option<SortDirection>,
    pub status: LoadStatus,
    pub mounted: bool,
}

impl ViewState {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            search_term: String::new(),
            market_cap_sort: None,
            change_sort: None,
            status: LoadStatus::Loading,
            mounted: true,
        }
    }

    pub fn sort_state(&self, field: SortField) -> Option<SortDirection> {
        match field {
            SortField::MarketCap => self.market_cap_sort,
            SortField::Change => self.change_sort,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

// Everything that can change the view state
#[derive(Debug)]
pub enum Action {
    FetchCompleted(Result<Vec<MarketRecord>, FetchError>),
    SearchChanged(String),
    Sort(SortField),
    Unmount,
}
