use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::QueryError;
use crate::operator::{Operator, SubjectCondition};

/// Issuer token that admits every issuer.
pub const WILDCARD_ISSUER: &str = "*";

const KEY_ALLOWED_ISSUERS: &str = "allowedIssuers";
const KEY_CONTEXT: &str = "context";
const KEY_TYPE: &str = "type";
const KEY_SCHEMA: &str = "schema";
const KEY_SUBJECT_CONDITIONS: &str = "subjectConditions";

const QUERY_KEYS: [&str; 5] = [
    KEY_ALLOWED_ISSUERS,
    KEY_CONTEXT,
    KEY_TYPE,
    KEY_SCHEMA,
    KEY_SUBJECT_CONDITIONS,
];

/// Which issuers a query admits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IssuerFilter {
    /// Any issuer (the wildcard was present, or no list was given).
    #[default]
    Any,
    /// Exactly these issuers. An empty set admits nothing.
    OneOf(BTreeSet<String>),
}

impl IssuerFilter {
    /// Build a filter from an allowed-issuer list; the wildcard anywhere wins.
    pub fn from_list<I, S>(issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let issuers: BTreeSet<String> = issuers.into_iter().map(Into::into).collect();
        if issuers.contains(WILDCARD_ISSUER) {
            Self::Any
        } else {
            Self::OneOf(issuers)
        }
    }

    /// Whether `issuer` passes the filter.
    pub fn admits(&self, issuer: &str) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf(issuers) => issuers.contains(issuer),
        }
    }
}

/// A decoded proof query: the credential filter of a disclosure request.
///
/// All present clauses must hold for a credential to match.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct ProofQuery {
    /// Issuers the credential may come from.
    pub allowed_issuers: IssuerFilter,
    /// Context the credential must carry.
    pub context: Option<String>,
    /// Type the credential must carry.
    pub credential_type: Option<String>,
    /// Schema id the credential must declare.
    pub schema: Option<String>,
    /// Subject field (dotted path) -> conditions on that field.
    pub subject_conditions: BTreeMap<String, Vec<SubjectCondition>>,
}

impl ProofQuery {
    /// Query matching every credential.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the admitted issuers.
    pub fn with_allowed_issuers<I, S>(mut self, issuers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_issuers = IssuerFilter::from_list(issuers);
        self
    }

    /// Require a context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Require a type.
    pub fn with_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type = Some(credential_type.into());
        self
    }

    /// Require a schema id.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Add a condition on a subject field.
    pub fn with_condition(
        mut self,
        field: impl Into<String>,
        operator: Operator,
        operand: Value,
    ) -> Self {
        self.subject_conditions
            .entry(field.into())
            .or_default()
            .push(SubjectCondition::new(operator, operand));
        self
    }

    /// Decode a JSON query.
    ///
    /// Top-level keys are checked before any subject condition, so a query
    /// with both an unknown key and an unknown operator reports the key.
    pub fn from_json(value: &Value) -> Result<Self, QueryError> {
        let object = value
            .as_object()
            .ok_or_else(|| QueryError::InvalidQuery("query must be a JSON object".into()))?;

        if let Some(key) = object.keys().find(|k| !QUERY_KEYS.contains(&k.as_str())) {
            return Err(QueryError::NotDefinedQueryKey(key.clone()));
        }

        let query = Self {
            allowed_issuers: match present(object, KEY_ALLOWED_ISSUERS) {
                Some(value) => IssuerFilter::from_list(string_list(KEY_ALLOWED_ISSUERS, value)?),
                None => IssuerFilter::Any,
            },
            context: optional_string(object, KEY_CONTEXT)?,
            credential_type: optional_string(object, KEY_TYPE)?,
            schema: optional_string(object, KEY_SCHEMA)?,
            subject_conditions: match present(object, KEY_SUBJECT_CONDITIONS) {
                Some(value) => subject_conditions(value)?,
                None => BTreeMap::new(),
            },
        };

        tracing::trace!(
            fields = query.subject_conditions.len(),
            "decoded proof query"
        );
        Ok(query)
    }
}

impl TryFrom<Value> for ProofQuery {
    type Error = QueryError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_json(&value)
    }
}

impl TryFrom<&Value> for ProofQuery {
    type Error = QueryError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        Self::from_json(value)
    }
}

impl FromStr for ProofQuery {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)
            .map_err(|e| QueryError::InvalidQuery(format!("malformed JSON: {}", e)))?;
        Self::from_json(&value)
    }
}

/// A key counts as absent when missing or `null`.
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn optional_string(object: &Map<String, Value>, key: &str) -> Result<Option<String>, QueryError> {
    match present(object, key) {
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(QueryError::InvalidQuery(format!(
            "{} must be a string, got: {}",
            key, other
        ))),
        None => Ok(None),
    }
}

fn string_list(key: &str, value: &Value) -> Result<Vec<String>, QueryError> {
    let invalid = || QueryError::InvalidQuery(format!("{} must be an array of strings", key));
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|item| item.as_str().map(str::to_string).ok_or_else(invalid))
        .collect()
}

/// Decode `field -> literal | {operator: operand, ...}`.
///
/// Each operator key of a clause object becomes its own condition; every
/// key must be a recognized operator. A bare literal means `$eq`.
fn subject_conditions(
    value: &Value,
) -> Result<BTreeMap<String, Vec<SubjectCondition>>, QueryError> {
    let fields = value.as_object().ok_or_else(|| {
        QueryError::InvalidQuery(format!("{} must be an object", KEY_SUBJECT_CONDITIONS))
    })?;

    let mut conditions = BTreeMap::new();
    for (field, clause) in fields {
        let parsed = match clause {
            Value::Object(operators) => operators
                .iter()
                .map(|(key, operand)| {
                    let operator = key.parse::<Operator>()?;
                    Ok(SubjectCondition::new(operator, operand.clone()))
                })
                .collect::<Result<Vec<_>, QueryError>>()?,
            literal => vec![SubjectCondition::eq(literal.clone())],
        };
        conditions.insert(field.clone(), parsed);
    }
    Ok(conditions)
}
