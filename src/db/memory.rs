use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::status::StatusCheck;
use crate::models::tryon::{TryOnRecord, TryOnUpdate};

/// In-process record store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    tryons: RwLock<HashMap<Uuid, TryOnRecord>>,
    status_checks: RwLock<Vec<StatusCheck>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn tryon_count(&self) -> usize {
        self.tryons.read().await.len()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert_tryon(&self, record: &TryOnRecord) -> Result<(), StoreError> {
        self.tryons.write().await.insert(record.id, record.clone());
        Ok(())
    }

    async fn update_tryon(&self, id: Uuid, update: &TryOnUpdate) -> Result<bool, StoreError> {
        Ok(match self.tryons.write().await.get_mut(&id) {
            Some(record) => record.apply(update),
            None => false,
        })
    }

    async fn find_tryon(&self, id: Uuid) -> Result<Option<TryOnRecord>, StoreError> {
        Ok(self.tryons.read().await.get(&id).cloned())
    }

    async fn list_tryons(&self, limit: i64) -> Result<Vec<TryOnRecord>, StoreError> {
        let mut records: Vec<TryOnRecord> = self.tryons.read().await.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(records)
    }

    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StoreError> {
        self.status_checks.write().await.push(check.clone());
        Ok(())
    }

    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>, StoreError> {
        let checks = self.status_checks.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(checks.iter().take(limit).cloned().collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
