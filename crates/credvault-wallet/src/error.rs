use credvault_query::QueryError;
use credvault_storage::StorageError;

/// Wallet errors. Messages of the wrapped errors pass through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Query(#[from] QueryError),
}
