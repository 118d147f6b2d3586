use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::CoreError;

/// Base type every credential carries.
pub const VERIFIABLE_CREDENTIAL_TYPE: &str = "VerifiableCredential";

/// A record that can be persisted by id.
///
/// Storage backends key records by this value; two records with the same id
/// are the same logical record.
pub trait Identified {
    /// Identifier of the record within its store.
    fn record_id(&self) -> &str;
}

/// Reference to the schema a credential was issued against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSchemaRef {
    /// Schema identifier (usually a URL).
    pub id: String,
    /// Schema type (e.g., "JsonSchemaValidator2018").
    #[serde(rename = "type", default)]
    pub schema_type: String,
}

/// A W3C-shaped Verifiable Credential as held by the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Unique credential identifier.
    pub id: String,
    /// JSON-LD contexts.
    #[serde(rename = "@context", default)]
    pub context: Vec<String>,
    /// Type(s) of the credential (e.g., ["VerifiableCredential", "KYCAgeCredential"]).
    #[serde(rename = "type", default)]
    pub credential_type: Vec<String>,
    /// Identifier of the issuer.
    pub issuer: String,
    /// Schema the credential conforms to, if declared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_schema: Option<CredentialSchemaRef>,
    /// Subject claims as a JSON object.
    #[serde(default = "empty_subject")]
    pub credential_subject: Value,
    /// When the credential was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuance_date: Option<DateTime<Utc>>,
    /// Optional expiration date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<DateTime<Utc>>,
    /// Proof attached by the issuer, kept opaque.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<Value>,
}

fn empty_subject() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Credential {
    /// Create a new credential with a fresh `urn:uuid` identifier.
    ///
    /// `VerifiableCredential` is always the first type and never duplicated.
    pub fn new(issuer: String, credential_type: Vec<String>, credential_subject: Value) -> Self {
        let mut types = vec![VERIFIABLE_CREDENTIAL_TYPE.to_string()];
        for t in credential_type {
            if t != VERIFIABLE_CREDENTIAL_TYPE {
                types.push(t);
            }
        }

        Self {
            id: format!("urn:uuid:{}", Uuid::now_v7()),
            context: Vec::new(),
            credential_type: types,
            issuer,
            credential_schema: None,
            credential_subject,
            issuance_date: Some(Utc::now()),
            expiration_date: None,
            proof: None,
        }
    }

    /// Replace the generated identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Set the JSON-LD contexts.
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context = context;
        self
    }

    /// Set the schema reference.
    pub fn with_schema(mut self, id: impl Into<String>, schema_type: impl Into<String>) -> Self {
        self.credential_schema = Some(CredentialSchemaRef {
            id: id.into(),
            schema_type: schema_type.into(),
        });
        self
    }

    /// Set the expiration date.
    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration_date = Some(expiration);
        self
    }

    /// Schema identifier, if the credential declares one.
    pub fn schema_id(&self) -> Option<&str> {
        self.credential_schema.as_ref().map(|s| s.id.as_str())
    }

    /// Whether `context` is one of the credential's contexts.
    pub fn has_context(&self, context: &str) -> bool {
        self.context.iter().any(|c| c == context)
    }

    /// Whether `credential_type` is one of the credential's types.
    pub fn has_type(&self, credential_type: &str) -> bool {
        self.credential_type.iter().any(|t| t == credential_type)
    }

    /// Resolve a dotted path (e.g. `address.city`) inside the subject.
    pub fn subject_value(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .try_fold(&self.credential_subject, |value, segment| {
                value.as_object()?.get(segment)
            })
    }

    /// Check if the credential has expired.
    pub fn is_expired(&self) -> bool {
        self.expiration_date
            .map(|exp| Utc::now() > exp)
            .unwrap_or(false)
    }

    /// Parse a single credential from JSON.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse either a single credential object or an array of them.
    pub fn from_json_batch(json: &str) -> Result<Vec<Self>, CoreError> {
        let value: Value = serde_json::from_str(json)?;
        match value {
            Value::Array(_) => Ok(serde_json::from_value(value)?),
            Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
            other => Err(CoreError::InvalidCredential(format!(
                "expected a credential object or array, got: {}",
                other
            ))),
        }
    }
}

impl Identified for Credential {
    fn record_id(&self) -> &str {
        &self.id
    }
}
