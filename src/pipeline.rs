//! Ordered resolution of a pair's rate from overrides and live sources.

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::core::rate::{CurrencyPair, RateRecord, RateSource};

/// Operator-supplied rates that take precedence over live sources.
/// Non-positive values are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateOverrides {
    /// Pins the rate outright, e.g. during a provider outage.
    pub fixed_rate: Option<Decimal>,
    /// Live rate supplied through configuration rather than fetched.
    pub operator_rate: Option<Decimal>,
}

impl RateOverrides {
    fn positive(value: Option<Decimal>) -> Option<Decimal> {
        value.filter(|rate| *rate > Decimal::ZERO)
    }

    pub fn fixed(&self) -> Option<Decimal> {
        Self::positive(self.fixed_rate)
    }

    pub fn operator(&self) -> Option<Decimal> {
        Self::positive(self.operator_rate)
    }
}

/// Tries each rate source in order and stops at the first success.
///
/// Overrides are checked before any network call. A source failure is
/// logged and never propagates; only exhausting every tier yields `None`.
pub struct RatePipeline {
    sources: Vec<Box<dyn RateSource>>,
}

impl RatePipeline {
    pub fn new(sources: Vec<Box<dyn RateSource>>) -> Self {
        RatePipeline { sources }
    }

    pub async fn resolve(
        &self,
        pair: &CurrencyPair,
        overrides: &RateOverrides,
    ) -> Option<RateRecord> {
        if let Some(rate) = overrides.fixed() {
            info!("Using fixed rate, {} = {}", pair, rate);
            return RateRecord::from_rate(pair, rate).ok();
        }

        if let Some(rate) = overrides.operator() {
            info!("Using configured rate, {} = {}", pair, rate);
            return RateRecord::from_rate(pair, rate).ok();
        }

        for source in &self.sources {
            match source.fetch(pair).await {
                Ok(record) => {
                    info!("{} rate, {} = {}", source.name(), pair, record.rate);
                    return Some(record);
                }
                Err(err) => {
                    warn!("Failed to fetch {} rate from {}: {}", pair, source.name(), err);
                }
            }
        }

        None
    }
}
