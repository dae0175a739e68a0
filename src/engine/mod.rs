// View state, the reducer that drives it, and the pure filter/sort pipeline
pub mod types;
pub mod pipeline;
pub mod state;

#[cfg(test)]
pub(crate) mod testing {
    use super::types::MarketRecord;

    // Minimal record with fixed price and volume
    pub fn record(id: &str, name: &str, market_cap: f64, change: Option<f64>) -> MarketRecord {
        MarketRecord {
            id: id.to_string(),
            name: name.to_string(),
            symbol: id.chars().take(3).collect(),
            image_url: format!("https://assets.example/{id}.png"),
            current_price: 1.0,
            total_volume: 100.0,
            market_cap,
            price_change_percentage_24h: change,
        }
    }
}
