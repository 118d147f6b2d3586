use async_trait::async_trait;
use tokio::sync::RwLock;

use credvault_core::Identified;

use crate::data_source::{self, DataSource, StoredRecord};
use crate::error::StorageError;

/// In-process backend that keeps records in insertion order.
///
/// Nothing survives the process; used for tests and ephemeral wallets.
pub struct InMemoryDataSource<T> {
    records: RwLock<Vec<StoredRecord<T>>>,
}

impl<T> InMemoryDataSource<T> {
    /// Create an empty data source.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }
}

impl<T> Default for InMemoryDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> DataSource<T> for InMemoryDataSource<T>
where
    T: Identified + Clone + Send + Sync + 'static,
{
    async fn save(&self, value: T) -> Result<(), StorageError> {
        let record = StoredRecord::new(value);
        tracing::trace!(id = %record.id, "in-memory upsert");
        data_source::upsert(&mut *self.records.write().await, record);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StorageError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.value.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        data_source::remove(&mut *self.records.write().await, id)
    }

    async fn list(&self) -> Result<Vec<T>, StorageError> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .map(|r| r.value.clone())
            .collect())
    }
}
