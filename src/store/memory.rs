use crate::core::rate::RateRecord;
use crate::core::store::RateStore;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// In-memory store used by tests and as a fallback when no durable
/// store is wanted.
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, RateRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateStore for MemoryStore {
    async fn upsert(&self, record: &RateRecord) -> Result<()> {
        let mut rates = self.inner.lock().await;
        rates.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<RateRecord>> {
        let rates = self.inner.lock().await;
        Ok(rates.get(id).cloned())
    }
}
