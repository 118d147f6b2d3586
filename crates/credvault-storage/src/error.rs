/// Storage backend errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("item not found to delete: {0}")]
    NotFoundToDelete(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("backend error: {0}")]
    Backend(String),

    #[cfg(feature = "rocksdb")]
    #[error("rocksdb error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}
