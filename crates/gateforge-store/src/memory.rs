//! Volatile store: tables in process memory, gone on restart.

use chrono::Utc;
use tokio::sync::RwLock;

use crate::tables::Tables;
use crate::{Record, RecordStore, StoreError};

/// A [`RecordStore`] that keeps everything in memory.
///
/// Reads share an `RwLock` read guard; each mutation takes the write
/// guard for exactly one operation. Useful for tests and for embedding
/// where persistence is handled elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    async fn get_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.tables.read().await.get_all()
    }

    async fn get<R: Record>(&self, key: &str) -> Result<Option<R>, StoreError> {
        self.tables.read().await.get(key)
    }

    async fn create<R: Record>(&self, record: R) -> Result<R, StoreError> {
        let created = self.tables.write().await.create(record, Utc::now())?;
        tracing::trace!(kind = %R::KIND, key = created.raw_key(), "record created");
        Ok(created)
    }

    async fn update<R: Record>(&self, record: &R) -> Result<R, StoreError> {
        self.tables.write().await.update(record, Utc::now())
    }

    async fn delete<R: Record>(&self, key: &str) -> Result<(), StoreError> {
        self.tables.write().await.delete::<R>(key)
    }

    async fn count<R: Record>(&self) -> Result<usize, StoreError> {
        Ok(self.tables.read().await.count::<R>())
    }
}
