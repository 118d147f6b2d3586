//! RocksDB storage backend.

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rocksdb::{IteratorMode, Options, DB};
use serde::de::DeserializeOwned;
use serde::Serialize;

use credvault_core::Identified;

use crate::data_source::DataSource;
use crate::error::StorageError;

/// Data source keeping one namespace per RocksDB column family.
///
/// Values are JSON, keyed by record id; `list` returns records in key order.
pub struct RocksDbDataSource<T> {
    db: Arc<DB>,
    namespace: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> RocksDbDataSource<T> {
    /// Open or create a database at `path` with a column family for `namespace`.
    pub fn open(path: &Path, namespace: &str) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let mut column_families = DB::list_cf(&opts, path).unwrap_or_default();
        if !column_families.iter().any(|cf| cf == namespace) {
            column_families.push(namespace.to_string());
        }

        let db = DB::open_cf(&opts, path, &column_families)?;
        Ok(Self::with_db(Arc::new(db), namespace))
    }

    /// Share an already opened database. The column family must exist.
    pub fn with_db(db: Arc<DB>, namespace: &str) -> Self {
        Self {
            db,
            namespace: namespace.to_string(),
            _marker: PhantomData,
        }
    }

    fn cf(&self) -> Result<&rocksdb::ColumnFamily, StorageError> {
        self.db.cf_handle(&self.namespace).ok_or_else(|| {
            StorageError::Backend(format!("column family '{}' not found", self.namespace))
        })
    }
}

#[async_trait]
impl<T> DataSource<T> for RocksDbDataSource<T>
where
    T: Identified + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn save(&self, value: T) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(&value)?;
        self.db
            .put_cf(self.cf()?, value.record_id().as_bytes(), bytes)?;
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StorageError> {
        match self.db.get_cf(self.cf()?, id.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let cf = self.cf()?;
        if self.db.get_pinned_cf(cf, id.as_bytes())?.is_none() {
            return Err(StorageError::NotFoundToDelete(id.to_string()));
        }
        self.db.delete_cf(cf, id.as_bytes())?;
        Ok(())
    }

    async fn list(&self) -> Result<Vec<T>, StorageError> {
        let mut records = Vec::new();
        for item in self.db.iterator_cf(self.cf()?, IteratorMode::Start) {
            let (_, value) = item?;
            records.push(serde_json::from_slice(&value)?);
        }
        Ok(records)
    }
}
