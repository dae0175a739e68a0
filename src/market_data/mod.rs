// Market data module entrypoint
pub mod adapters;       // remote sources (CoinGecko)
pub mod normaliser;     // wire objects -> validated MarketRecords
