pub mod classifier;
pub mod codec;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod lambda;
pub mod logging;
pub mod metrics;
pub mod transformer;
pub mod types;

// Use case and ports, with adapters behind them
pub mod app;
pub mod infra;
