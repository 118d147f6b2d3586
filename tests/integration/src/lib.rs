//! Shared fixtures for the credvault integration tests.

use std::path::PathBuf;

use credvault_core::Credential;
use serde_json::json;

/// Schema id shared by every fixture credential.
pub const SCHEMA_ID: &str = "credentialSchemaId";

/// No issuance date, so repeated calls compare equal.
fn fixture(
    id: &str,
    issuer: &str,
    context: &[&str],
    types: &[&str],
    birthday: u64,
    country: u64,
) -> Credential {
    let mut credential = Credential::new(
        issuer.to_string(),
        Vec::new(),
        json!({ "birthday": birthday, "countryCode": country }),
    )
    .with_id(id)
    .with_context(context.iter().map(|c| c.to_string()).collect())
    .with_schema(SCHEMA_ID, "JsonSchemaValidator2018");
    credential.credential_type = types.iter().map(|t| t.to_string()).collect();
    credential.issuance_date = None;
    credential
}

/// issuer1, birthday 20000101, countryCode 11.
pub fn cred1() -> Credential {
    fixture(
        "test1",
        "issuer1",
        &["context1", "context2"],
        &["type1_1", "type1_2"],
        20000101,
        11,
    )
}

/// issuer2, birthday 20000102, countryCode 11.
pub fn cred2() -> Credential {
    fixture(
        "test2",
        "issuer2",
        &["context2_1", "context2_2"],
        &["type2_1", "type2_2", "type2_3"],
        20000102,
        11,
    )
}

/// issuer3, birthday 20000103, countryCode 120.
pub fn cred3() -> Credential {
    fixture(
        "test3",
        "issuer3",
        &["context3_1", "context3_2"],
        &["type3_1", "type3_2", "type3_3"],
        20000103,
        120,
    )
}

/// Sorted ids, for order-independent comparisons.
pub fn sorted_ids(credentials: &[Credential]) -> Vec<String> {
    let mut ids: Vec<String> = credentials.iter().map(|c| c.id.clone()).collect();
    ids.sort();
    ids
}

/// A fresh directory under the system temp dir.
pub fn temp_dir(prefix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("{}-{}", prefix, rand::random::<u64>()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
