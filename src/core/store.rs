//! Persistence abstraction for rate records

use crate::core::rate::RateRecord;
use anyhow::Result;
use async_trait::async_trait;

/// Keyed storage for the latest rate per pair. `upsert` replaces the row
/// identified by `record.id` and is idempotent under retry.
#[async_trait]
pub trait RateStore: Send + Sync {
    async fn upsert(&self, record: &RateRecord) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<RateRecord>>;
}
