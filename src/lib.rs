pub mod app;
pub mod config;
pub mod engine;
pub mod market_data;
pub mod telemetry;
pub mod tui;
pub mod view;
