//! Subcommand implementations and the wallet they operate on.

pub mod find;
pub mod import;
pub mod init;
pub mod list;
pub mod query;
pub mod remove;
pub mod show;

use credvault_storage::{CredentialStorage, FileKeyValueStore};
use credvault_wallet::CredentialWallet;
use serde::Serialize;

use crate::config::{BackendKind, StorageConfig};

/// Open the wallet on the configured backend.
pub fn open_wallet(config: &StorageConfig) -> anyhow::Result<CredentialWallet> {
    let storage = match config.backend {
        BackendKind::Memory => CredentialStorage::in_memory(),
        BackendKind::File => {
            let store = FileKeyValueStore::open(&config.data_dir)?;
            CredentialStorage::with_key_value_store(store)
        }
        #[cfg(feature = "rocksdb")]
        BackendKind::Rocksdb => CredentialStorage::with_rocksdb(&config.data_dir.join("rocksdb"))?,
        #[cfg(not(feature = "rocksdb"))]
        BackendKind::Rocksdb => {
            anyhow::bail!("rocksdb backend requested but credvault was built without the `rocksdb` feature")
        }
    };
    tracing::debug!(backend = ?config.backend, data_dir = %config.data_dir.display(), "wallet opened");
    Ok(CredentialWallet::new(storage))
}

/// Pretty-print a value as JSON on stdout.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
