use serde_json::Value;

use credvault_core::Credential;
use credvault_query::{ProofQuery, QueryEngine};
use credvault_storage::{CredentialStorage, DataSource};

use crate::error::WalletError;

/// Credential wallet for a holder — stores, finds and removes verifiable credentials.
///
/// Lookups treat a missing id as an ordinary result; removal of a missing id
/// is an error. Every find performs a full scan of the storage.
pub struct CredentialWallet {
    storage: CredentialStorage,
    engine: QueryEngine,
}

impl CredentialWallet {
    /// Create a wallet over the given credential storage.
    pub fn new(storage: CredentialStorage) -> Self {
        Self {
            storage,
            engine: QueryEngine::new(),
        }
    }

    /// Create a wallet that keeps credentials in memory only.
    pub fn in_memory() -> Self {
        Self::new(CredentialStorage::in_memory())
    }

    /// All stored credentials, in storage order.
    pub async fn list(&self) -> Result<Vec<Credential>, WalletError> {
        Ok(self.storage.list().await?)
    }

    /// Number of stored credentials.
    pub async fn count(&self) -> Result<usize, WalletError> {
        Ok(self.storage.list().await?.len())
    }

    /// Store a credential, replacing any credential with the same id.
    pub async fn save(&self, credential: Credential) -> Result<(), WalletError> {
        let id = credential.id.clone();
        self.storage.save(credential).await?;
        tracing::debug!(credential_id = %id, "credential stored in wallet");
        Ok(())
    }

    /// Store credentials in order; a later duplicate id wins.
    ///
    /// Not atomic unless the backend is: a failure may leave the credentials
    /// before it stored.
    pub async fn save_all(&self, credentials: Vec<Credential>) -> Result<(), WalletError> {
        let count = credentials.len();
        self.storage.save_all(credentials).await?;
        tracing::debug!(count, "credentials stored in wallet");
        Ok(())
    }

    /// Get a credential by id. A missing id is `Ok(None)`.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Credential>, WalletError> {
        let credential = self.storage.get(id).await?;
        tracing::debug!(credential_id = %id, found = credential.is_some(), "credential lookup");
        Ok(credential)
    }

    /// Credentials carrying both `context` and `credential_type`.
    pub async fn find_by_context_type(
        &self,
        context: &str,
        credential_type: &str,
    ) -> Result<Vec<Credential>, WalletError> {
        let found: Vec<Credential> = self
            .storage
            .list()
            .await?
            .into_iter()
            .filter(|c| c.has_context(context) && c.has_type(credential_type))
            .collect();
        tracing::debug!(context, credential_type, count = found.len(), "context/type lookup");
        Ok(found)
    }

    /// Credentials matching a decoded proof query, in storage order.
    pub async fn find_by_query(&self, query: &ProofQuery) -> Result<Vec<Credential>, WalletError> {
        let found = self.engine.select_all(self.storage.list().await?, query);
        tracing::debug!(count = found.len(), "proof query evaluated");
        Ok(found)
    }

    /// Decode a JSON proof query and run it.
    ///
    /// An unknown key or operator aborts the call before storage is read.
    pub async fn find_by_json_query(&self, raw: &Value) -> Result<Vec<Credential>, WalletError> {
        let query = ProofQuery::from_json(raw)?;
        self.find_by_query(&query).await
    }

    /// Remove a credential by id.
    ///
    /// Fails with `item not found to delete: <id>` if no such credential exists.
    pub async fn remove(&self, id: &str) -> Result<(), WalletError> {
        self.storage.delete(id).await?;
        tracing::debug!(credential_id = %id, "credential removed from wallet");
        Ok(())
    }
}
