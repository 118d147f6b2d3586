//! Backends built on a string key/value store.
//!
//! A [`KeyValueStore`] is the shape of browser-style persistent storage
//! (`getItem`/`setItem`/`removeItem`). It is always injected into
//! [`KeyValueDataSource`], never reached through process-wide state, so the
//! same data source runs against a file directory, an embedder-provided
//! store, or [`MemoryKeyValueStore`] in tests.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

use credvault_core::Identified;

use crate::data_source::{self, DataSource, StoredRecord};
use crate::error::StorageError;

/// Minimal string key/value capability.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, if any.
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key).await
    }
}

/// In-process key/value store.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    items: DashMap<String, String>,
}

impl MemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop every key.
    pub fn clear(&self) {
        self.items.clear();
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

/// Key/value store keeping one file per key inside a directory.
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// Directory backing this store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }
}

/// Escape `key` into a file stem. ASCII letters, digits and `-` pass through;
/// every other byte, `_` included, becomes `_` plus two hex digits, so distinct
/// keys never share a file and no stem contains a path separator or dot.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push('_');
            stem.push_str(&hex::encode([byte]));
        }
    }
    stem
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Data source storing a whole namespace as one JSON array under a single key.
///
/// Every operation reads and rewrites that array. Writes through this instance
/// are serialized; separate instances sharing a store are not coordinated.
pub struct KeyValueDataSource<T, S> {
    store: S,
    namespace: String,
    write_lock: Mutex<()>,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S> KeyValueDataSource<T, S>
where
    T: Serialize + DeserializeOwned,
    S: KeyValueStore,
{
    /// Create a data source keeping its records under `namespace`.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            write_lock: Mutex::new(()),
            _marker: PhantomData,
        }
    }

    /// Key the records are stored under.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn load(&self) -> Result<Vec<StoredRecord<T>>, StorageError> {
        match self.store.get_item(&self.namespace).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist(&self, records: &[StoredRecord<T>]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(records)?;
        self.store.set_item(&self.namespace, raw).await
    }
}

#[async_trait]
impl<T, S> DataSource<T> for KeyValueDataSource<T, S>
where
    T: Identified + Serialize + DeserializeOwned + Send + Sync + 'static,
    S: KeyValueStore,
{
    async fn save(&self, value: T) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        data_source::upsert(&mut records, StoredRecord::new(value));
        self.persist(&records).await
    }

    /// Applies every entry to one loaded copy and writes it back once, so
    /// either all entries land or none do.
    async fn save_all(&self, values: Vec<T>) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        for value in values {
            data_source::upsert(&mut records, StoredRecord::new(value));
        }
        tracing::trace!(namespace = %self.namespace, count = records.len(), "key/value batch upsert");
        self.persist(&records).await
    }

    async fn get(&self, id: &str) -> Result<Option<T>, StorageError> {
        Ok(self
            .load()
            .await?
            .into_iter()
            .find(|r| r.id == id)
            .map(|r| r.value))
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        data_source::remove(&mut records, id)?;
        self.persist(&records).await
    }

    async fn list(&self) -> Result<Vec<T>, StorageError> {
        Ok(self.load().await?.into_iter().map(|r| r.value).collect())
    }
}
