//! Credvault Storage
//!
//! Backend-agnostic persistence for identified records:
//! - [`DataSource`], the async capability contract every backend satisfies
//! - [`InMemoryDataSource`], an insertion-ordered in-process backend
//! - [`KeyValueDataSource`] over an injected [`KeyValueStore`]
//!   ([`MemoryKeyValueStore`], [`FileKeyValueStore`])
//! - `RocksDbDataSource` behind the `rocksdb` feature
//! - [`CredentialStorage`], the single credential namespace used by wallets

pub mod credential_storage;
pub mod data_source;
pub mod error;
pub mod key_value;
pub mod memory;
#[cfg(feature = "rocksdb")]
pub mod rocks;

pub use credential_storage::CredentialStorage;
pub use data_source::{DataSource, StoredRecord};
pub use error::StorageError;
pub use key_value::{FileKeyValueStore, KeyValueDataSource, KeyValueStore, MemoryKeyValueStore};
pub use memory::InMemoryDataSource;
#[cfg(feature = "rocksdb")]
pub use rocks::RocksDbDataSource;
