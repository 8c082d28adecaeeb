use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::debug;

use crate::core::rate::{CurrencyPair, RateRecord, RateSource, SourceError};
use crate::providers::util::{HttpSettings, build_client};

/// Rate source backed by Binance's price ticker endpoint.
///
/// The ticker returns a single direction as a decimal string, so the
/// forward rate is derived by arithmetic inversion.
pub struct BinanceTickerSource {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceTickerSource {
    pub fn new(base_url: &str, settings: &HttpSettings) -> Result<Self> {
        Ok(BinanceTickerSource {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: build_client(settings)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TickerResponse {
    symbol: String,
    price: String,
}

/// The venue lists the market with our quote currency first, e.g.
/// `TRXUSDT` for the USDT/TRX pair.
fn market_symbol(pair: &CurrencyPair) -> String {
    format!("{}{}", pair.quote, pair.base)
}

/// Maps a ticker price onto the canonical record shape. `price` is base
/// units per one quote unit, so rate = 1/price and inverse rate = price.
fn record_from_ticker(pair: &CurrencyPair, price: Decimal) -> Result<RateRecord, SourceError> {
    if price <= Decimal::ZERO {
        return Err(SourceError::NonPositive(price));
    }
    RateRecord::new(pair, Decimal::ONE / price, price)
}

#[async_trait]
impl RateSource for BinanceTickerSource {
    fn name(&self) -> &str {
        "binance"
    }

    async fn fetch(&self, pair: &CurrencyPair) -> Result<RateRecord, SourceError> {
        let symbol = market_symbol(pair);
        let url = format!("{}/api/v3/ticker/price", self.base_url);
        debug!("Requesting price ticker from {} for {}", url, symbol);

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let ticker: TickerResponse = serde_json::from_str(&text)
            .map_err(|e| SourceError::Malformed(format!("{e}; body: '{text}'")))?;

        debug!("Received ticker {}: {}", ticker.symbol, ticker.price);

        let price = Decimal::from_str(ticker.price.trim()).map_err(|_| {
            SourceError::Malformed(format!("unparsable price '{}'", ticker.price))
        })?;

        record_from_ticker(pair, price)
    }
}
