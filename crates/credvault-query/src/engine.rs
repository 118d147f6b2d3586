use serde_json::Value;

use credvault_core::Credential;

use crate::error::QueryError;
use crate::query::ProofQuery;

/// Stateless evaluator of proof queries against credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryEngine;

impl QueryEngine {
    /// Create a query engine.
    pub fn new() -> Self {
        Self
    }

    /// Whether `credential` satisfies every clause of `query`.
    pub fn matches(&self, credential: &Credential, query: &ProofQuery) -> bool {
        query.allowed_issuers.admits(&credential.issuer)
            && query
                .context
                .as_deref()
                .map_or(true, |c| credential.has_context(c))
            && query
                .credential_type
                .as_deref()
                .map_or(true, |t| credential.has_type(t))
            && query
                .schema
                .as_deref()
                .map_or(true, |s| credential.schema_id() == Some(s))
            && query.subject_conditions.iter().all(|(field, conditions)| {
                let stored = credential.subject_value(field);
                conditions.iter().all(|c| c.evaluate(stored))
            })
    }

    /// Keep the credentials matching `query`, in their original order.
    pub fn select_all(&self, credentials: Vec<Credential>, query: &ProofQuery) -> Vec<Credential> {
        credentials
            .into_iter()
            .filter(|c| self.matches(c, query))
            .collect()
    }

    /// Decode `raw` and select with it. Nothing is evaluated if decoding fails.
    pub fn select_json(
        &self,
        credentials: Vec<Credential>,
        raw: &Value,
    ) -> Result<Vec<Credential>, QueryError> {
        let query = ProofQuery::from_json(raw)?;
        Ok(self.select_all(credentials, &query))
    }
}
