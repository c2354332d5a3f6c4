use async_trait::async_trait;
use uuid::Uuid;

use crate::models::status::StatusCheck;
use crate::models::tryon::{TryOnRecord, TryOnUpdate};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence for try-on records and status checks.
///
/// Pass-through adapter: no transactions, concurrent updates to one id are
/// last-write-wins.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert_tryon(&self, record: &TryOnRecord) -> Result<(), StoreError>;

    /// Settle a record. Applies only while the stored status is still
    /// `processing`; returns whether a row changed.
    async fn update_tryon(&self, id: Uuid, update: &TryOnUpdate) -> Result<bool, StoreError>;

    async fn find_tryon(&self, id: Uuid) -> Result<Option<TryOnRecord>, StoreError>;

    /// Newest first by `created_at`.
    async fn list_tryons(&self, limit: i64) -> Result<Vec<TryOnRecord>, StoreError>;

    async fn insert_status_check(&self, check: &StatusCheck) -> Result<(), StoreError>;

    async fn list_status_checks(&self, limit: i64) -> Result<Vec<StatusCheck>, StoreError>;

    /// Connectivity check for `/health`.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self) {}
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: Uuid, reason: String },
}
