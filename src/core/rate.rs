//! Rate domain types and the source abstraction

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usdt,
    Trx,
    Btc,
    Eth,
    Usd,
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Currency::Usdt => "USDT",
                Currency::Trx => "TRX",
                Currency::Btc => "BTC",
                Currency::Eth => "ETH",
                Currency::Usd => "USD",
            }
        )
    }
}

impl FromStr for Currency {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USDT" => Ok(Currency::Usdt),
            "TRX" => Ok(Currency::Trx),
            "BTC" => Ok(Currency::Btc),
            "ETH" => Ok(Currency::Eth),
            "USD" => Ok(Currency::Usd),
            _ => Err(anyhow::anyhow!("Unknown currency code: {}", s)),
        }
    }
}

/// An ordered (base, quote) currency combination whose rate is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: Currency,
    pub quote: Currency,
}

impl CurrencyPair {
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Stable store key for this pair, e.g. `USDT_TRX`.
    pub fn id(&self) -> String {
        format!("{}_{}", self.base, self.quote)
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// The latest known conversion factor for a pair, in both directions.
///
/// `rate` is quote units per one base unit; `inverse_rate` is the
/// reciprocal unless a source supplies an independent inverse value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    pub id: String,
    pub base: Currency,
    pub quote: Currency,
    pub rate: Decimal,
    pub inverse_rate: Decimal,
    pub last_update_time: DateTime<Utc>,
}

impl RateRecord {
    /// Builds a record from both directions as a source supplied them.
    /// Rejects non-positive values in either direction.
    pub fn new(
        pair: &CurrencyPair,
        rate: Decimal,
        inverse_rate: Decimal,
    ) -> Result<Self, SourceError> {
        if rate <= Decimal::ZERO {
            return Err(SourceError::NonPositive(rate));
        }
        if inverse_rate <= Decimal::ZERO {
            return Err(SourceError::NonPositive(inverse_rate));
        }
        Ok(Self {
            id: pair.id(),
            base: pair.base,
            quote: pair.quote,
            rate,
            inverse_rate,
            last_update_time: Utc::now(),
        })
    }

    /// Builds a record from a single forward rate, deriving the inverse.
    pub fn from_rate(pair: &CurrencyPair, rate: Decimal) -> Result<Self, SourceError> {
        if rate <= Decimal::ZERO {
            return Err(SourceError::NonPositive(rate));
        }
        Self::new(pair, rate, Decimal::ONE / rate)
    }
}

/// Failure of one rate source. Detail is for logs only; every variant is
/// treated as "source unavailable" by the resolution chain.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("provider error code {code}: {message}")]
    Api { code: i64, message: String },
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("non-positive rate: {0}")]
    NonPositive(Decimal),
}

/// One external pricing source. Implementations own the mapping from
/// their native response shape to a [`RateRecord`].
#[async_trait]
pub trait RateSource: Send + Sync {
    /// Short source name for log attribution.
    fn name(&self) -> &str;

    async fn fetch(&self, pair: &CurrencyPair) -> Result<RateRecord, SourceError>;
}
