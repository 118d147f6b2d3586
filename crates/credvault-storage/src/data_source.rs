use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use credvault_core::Identified;

use crate::error::StorageError;

/// A record as persisted by a backend: the payload plus the id it is keyed by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord<T> {
    /// Record identifier, copied from the payload at save time.
    pub id: String,
    /// The record itself.
    pub value: T,
}

impl<T: Identified> StoredRecord<T> {
    /// Wrap a record, keying it by its own id.
    pub fn new(value: T) -> Self {
        Self {
            id: value.record_id().to_string(),
            value,
        }
    }
}

/// Capability contract for storing and retrieving identified records.
///
/// Implementations decide durability and `list` order. `save_all` is applied
/// entry by entry and is not atomic: if a save fails part way through, the
/// entries before it stay committed.
#[async_trait]
pub trait DataSource<T>: Send + Sync
where
    T: Identified + Send + Sync + 'static,
{
    /// Insert or replace the record with the same id.
    async fn save(&self, value: T) -> Result<(), StorageError>;

    /// Upsert each record in order; a later duplicate id wins.
    async fn save_all(&self, values: Vec<T>) -> Result<(), StorageError> {
        for value in values {
            self.save(value).await?;
        }
        Ok(())
    }

    /// Fetch a record by id. A missing id is `Ok(None)`.
    async fn get(&self, id: &str) -> Result<Option<T>, StorageError>;

    /// Remove a record by id.
    ///
    /// Fails with [`StorageError::NotFoundToDelete`] when no record has that id.
    async fn delete(&self, id: &str) -> Result<(), StorageError>;

    /// All records, in backend-defined order.
    async fn list(&self) -> Result<Vec<T>, StorageError>;
}

/// Replace the record with the same id in place, or append it.
pub(crate) fn upsert<T>(records: &mut Vec<StoredRecord<T>>, record: StoredRecord<T>) {
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(existing) => *existing = record,
        None => records.push(record),
    }
}

/// Remove the record with `id`, failing if it is absent.
pub(crate) fn remove<T>(records: &mut Vec<StoredRecord<T>>, id: &str) -> Result<(), StorageError> {
    let index = records
        .iter()
        .position(|r| r.id == id)
        .ok_or_else(|| StorageError::NotFoundToDelete(id.to_string()))?;
    records.remove(index);
    Ok(())
}
