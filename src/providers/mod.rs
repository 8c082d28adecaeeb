pub mod binance;
pub mod okx;
pub mod util;

// Re-export the concrete sources for cleaner wiring
pub use binance::BinanceTickerSource;
pub use okx::OkxQuoteSource;
pub use util::HttpSettings;
