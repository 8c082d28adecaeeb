pub mod core;
pub mod pipeline;
pub mod providers;
pub mod scheduler;
pub mod store;
pub mod task;

use crate::core::config::AppConfig;
use crate::core::rate::{CurrencyPair, RateSource};
use crate::pipeline::{RateOverrides, RatePipeline};
use crate::providers::{BinanceTickerSource, HttpSettings, OkxQuoteSource};
use crate::store::FjallStore;
use crate::task::RateUpdateTask;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub enum AppCommand {
    /// Run a single update cycle and exit.
    Once,
    /// Keep updating on the configured interval until stopped.
    Run,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Rate sync starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let task = build_task(&config)?;

    match command {
        AppCommand::Once => {
            task.run().await;
        }
        AppCommand::Run => {
            let period = Duration::from_secs(config.update_interval_secs);
            scheduler::run_scheduler(task, period).await;
        }
    }

    Ok(())
}

fn build_task(config: &AppConfig) -> Result<RateUpdateTask> {
    let settings = HttpSettings::with_proxy(config.web_proxy.clone());

    // Attempt order: OKX first, Binance as fallback
    let mut sources: Vec<Box<dyn RateSource>> = Vec::new();
    if let Some(okx) = &config.providers.okx {
        sources.push(Box::new(OkxQuoteSource::new(&okx.base_url, &settings)?));
    }
    if let Some(binance) = &config.providers.binance {
        sources.push(Box::new(BinanceTickerSource::new(
            &binance.base_url,
            &settings,
        )?));
    }
    let pipeline = RatePipeline::new(sources);

    let store = Arc::new(FjallStore::open(&config.default_data_path()?)?);

    let pair = CurrencyPair::new(config.pair.base, config.pair.quote);
    let overrides = RateOverrides {
        fixed_rate: config.fixed_rate,
        operator_rate: config.override_rate,
    };

    Ok(RateUpdateTask::new(pipeline, store, pair, overrides))
}
