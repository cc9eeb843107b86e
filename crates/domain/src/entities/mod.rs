pub mod market_data_source;
pub mod pool;

// Re-export for easier access
pub use market_data_source::MarketDataSource;
pub use pool::PoolKey;
