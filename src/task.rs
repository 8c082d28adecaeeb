//! The per-tick update cycle: resolve the pair's rate and persist it.

use std::sync::Arc;
use tracing::{error, info};

use crate::core::rate::CurrencyPair;
use crate::core::store::RateStore;
use crate::pipeline::{RateOverrides, RatePipeline};

/// One update cycle over the configured pair. `run` never fails: every
/// source or store problem ends up in the logs, and the previously
/// stored record stays the latest known rate.
pub struct RateUpdateTask {
    pipeline: RatePipeline,
    store: Arc<dyn RateStore>,
    pair: CurrencyPair,
    overrides: RateOverrides,
}

impl RateUpdateTask {
    pub fn new(
        pipeline: RatePipeline,
        store: Arc<dyn RateStore>,
        pair: CurrencyPair,
        overrides: RateOverrides,
    ) -> Self {
        RateUpdateTask {
            pipeline,
            store,
            pair,
            overrides,
        }
    }

    pub async fn run(&self) {
        info!("------------------ rate update started ------------------");

        let resolved = self.pipeline.resolve(&self.pair, &self.overrides).await;
        for record in resolved {
            info!(
                "Updating rate, {} -> {} = {}",
                record.base, record.quote, record.rate
            );
            if let Err(err) = self.store.upsert(&record).await {
                error!("Failed to persist rate for {}: {:#}", record.id, err);
            }
        }

        info!("------------------ rate update finished ------------------");
    }
}
