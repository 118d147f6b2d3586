use async_trait::async_trait;

use credvault_core::Credential;

use crate::data_source::DataSource;
use crate::error::StorageError;
use crate::key_value::{KeyValueDataSource, KeyValueStore};
use crate::memory::InMemoryDataSource;

/// The credential namespace of a wallet.
///
/// Pins the record type to [`Credential`] and the namespace to
/// [`CredentialStorage::STORAGE_KEY`], so wallets never pick a backend or a
/// key themselves.
pub struct CredentialStorage {
    source: Box<dyn DataSource<Credential>>,
}

impl CredentialStorage {
    /// Namespace credentials are stored under in multiplexing backends.
    pub const STORAGE_KEY: &'static str = "credentials";

    /// Wrap any credential data source.
    pub fn new(source: impl DataSource<Credential> + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Storage backed by an [`InMemoryDataSource`].
    pub fn in_memory() -> Self {
        Self::new(InMemoryDataSource::<Credential>::new())
    }

    /// Storage over an injected key/value store, under [`Self::STORAGE_KEY`].
    pub fn with_key_value_store<S: KeyValueStore + 'static>(store: S) -> Self {
        Self::new(KeyValueDataSource::<Credential, S>::new(
            store,
            Self::STORAGE_KEY,
        ))
    }

    /// Storage in a RocksDB database at `path`, column family [`Self::STORAGE_KEY`].
    #[cfg(feature = "rocksdb")]
    pub fn with_rocksdb(path: &std::path::Path) -> Result<Self, StorageError> {
        Ok(Self::new(crate::rocks::RocksDbDataSource::<Credential>::open(
            path,
            Self::STORAGE_KEY,
        )?))
    }
}

#[async_trait]
impl DataSource<Credential> for CredentialStorage {
    async fn save(&self, value: Credential) -> Result<(), StorageError> {
        self.source.save(value).await
    }

    async fn save_all(&self, values: Vec<Credential>) -> Result<(), StorageError> {
        self.source.save_all(values).await
    }

    async fn get(&self, id: &str) -> Result<Option<Credential>, StorageError> {
        self.source.get(id).await
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        self.source.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Credential>, StorageError> {
        self.source.list().await
    }
}
