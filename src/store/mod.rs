pub mod memory;

use crate::core::rate::RateRecord;
use crate::core::store::RateStore;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;

/// Durable store keyed by record id, backed by a fjall partition.
/// Inserts are atomic per key, so an upsert either fully replaces the
/// previous record or leaves it in place.
pub struct FjallStore {
    _keyspace: Keyspace,
    rates: PartitionHandle,
}

impl FjallStore {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let rates = keyspace
            .open_partition("rates", PartitionCreateOptions::default())
            .context("Failed to open rates partition")?;

        Ok(FjallStore {
            _keyspace: keyspace,
            rates,
        })
    }
}

#[async_trait]
impl RateStore for FjallStore {
    async fn upsert(&self, record: &RateRecord) -> Result<()> {
        let value = serde_json::to_vec(record)?;
        self.rates
            .insert(record.id.as_bytes(), value)
            .with_context(|| format!("Failed to upsert rate record {}", record.id))?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<RateRecord>> {
        match self
            .rates
            .get(id.as_bytes())
            .with_context(|| format!("Failed to read rate record {id}"))?
        {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}
