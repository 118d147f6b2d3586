//! Integration test: full wallet flow across storage backends.
//!
//! Runs the same save / lookup / query / remove sequence against every
//! backend a wallet can be built on.

use std::sync::Arc;

use credvault_core::Credential;
use credvault_integration_tests::{cred1, cred2, cred3, sorted_ids, temp_dir, SCHEMA_ID};
use credvault_query::{Operator, ProofQuery, QueryError};
use credvault_storage::{
    CredentialStorage, FileKeyValueStore, InMemoryDataSource, KeyValueStore, MemoryKeyValueStore,
    StorageError,
};
use credvault_wallet::{CredentialWallet, WalletError};
use serde_json::json;

async fn query_ids(wallet: &CredentialWallet, query: serde_json::Value) -> Vec<String> {
    let found = wallet
        .find_by_json_query(&query)
        .await
        .expect("query should succeed");
    sorted_ids(&found)
}

fn ids(expected: &[Credential]) -> Vec<String> {
    sorted_ids(expected)
}

async fn credential_flow(wallet: CredentialWallet) {
    wallet.save_all(vec![cred1(), cred2()]).await.unwrap();
    assert_eq!(wallet.list().await.unwrap().len(), 2);

    wallet.save(cred3()).await.unwrap();
    assert_eq!(wallet.list().await.unwrap().len(), 3);

    // Upsert keeps the size and returns the latest payload
    let mut updated = cred3();
    updated.credential_subject = json!({ "birthday": 20000103, "countryCode": 120, "v": 2 });
    wallet.save(updated.clone()).await.unwrap();
    assert_eq!(wallet.list().await.unwrap().len(), 3);
    assert_eq!(wallet.find_by_id("test3").await.unwrap(), Some(updated));

    // Present and absent ids
    assert_eq!(wallet.find_by_id("test2").await.unwrap(), Some(cred2()));
    assert!(wallet.find_by_id("otherId").await.unwrap().is_none());

    // Context and type must both be present
    let found = wallet
        .find_by_context_type("context1", "type1_2")
        .await
        .unwrap();
    assert_eq!(ids(&found), ids(&[cred1()]));
    assert!(wallet
        .find_by_context_type("context1", "nope")
        .await
        .unwrap()
        .is_empty());

    let cases = vec![
        (json!({ "allowedIssuers": ["*"] }), vec![cred1(), cred2(), cred3()]),
        (json!({ "allowedIssuers": ["*"], "type": "type1_1" }), vec![cred1()]),
        (json!({ "allowedIssuers": ["issuer3", "issuer2"] }), vec![cred2(), cred3()]),
        (
            json!({
                "allowedIssuers": ["*"],
                "context": "context3_2",
                "type": "type3_3",
                "schema": SCHEMA_ID
            }),
            vec![cred3()],
        ),
        (
            json!({
                "allowedIssuers": ["*"],
                "context": "context2_2",
                "type": "type2_3",
                "schema": SCHEMA_ID,
                "subjectConditions": { "birthday": { "$gt": 20000100 } }
            }),
            vec![cred2()],
        ),
        (
            json!({
                "allowedIssuers": ["*"],
                "subjectConditions": { "birthday": { "$lt": 20000102 } }
            }),
            vec![cred1()],
        ),
        (
            json!({
                "allowedIssuers": ["*"],
                "subjectConditions": { "birthday": { "$gt": 20000102 } }
            }),
            vec![cred3()],
        ),
        (
            json!({
                "allowedIssuers": ["*"],
                "subjectConditions": { "countryCode": { "$eq": 120 } }
            }),
            vec![cred3()],
        ),
        (
            json!({
                "allowedIssuers": ["*"],
                "subjectConditions": { "countryCode": 120 }
            }),
            vec![cred3()],
        ),
        (
            json!({
                "allowedIssuers": ["*"],
                "subjectConditions": { "countryCode": { "$in": [11, 120] } }
            }),
            vec![cred1(), cred2(), cred3()],
        ),
        (
            json!({
                "allowedIssuers": ["*"],
                "type": "type3_1",
                "subjectConditions": { "countryCode": { "$in": [11, 120] } }
            }),
            vec![cred3()],
        ),
        (
            json!({
                "allowedIssuers": ["*"],
                "subjectConditions": { "countryCode": { "$nin": [11, 111] } }
            }),
            vec![cred3()],
        ),
    ];

    for (query, expected) in cases {
        assert_eq!(
            query_ids(&wallet, query.clone()).await,
            ids(&expected),
            "query: {}",
            query
        );
    }

    // Typed queries behave like their JSON form
    let typed = ProofQuery::new()
        .with_allowed_issuers(["issuer1", "issuer3"])
        .with_condition("countryCode", Operator::Nin, json!([120]));
    let found = wallet.find_by_query(&typed).await.unwrap();
    assert_eq!(ids(&found), ids(&[cred1()]));

    // Malformed queries abort the whole call
    let err = wallet
        .find_by_json_query(&json!({
            "allowedIssuers": ["*"],
            "subjectConditions": { "countryCode": { "$custom": [11, 111] } }
        }))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        WalletError::Query(QueryError::NotDefinedComparator(_))
    ));

    let err = wallet
        .find_by_json_query(&json!({ "allowedIssuers": ["*"], "someProp": "" }))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::Query(QueryError::NotDefinedQueryKey(_))));

    // Deleting a missing id fails and changes nothing
    let err = wallet.remove("unknowId").await.unwrap_err();
    assert_eq!(err.to_string(), "item not found to delete: unknowId");
    assert_eq!(wallet.list().await.unwrap().len(), 3);

    wallet.remove("test1").await.unwrap();
    assert_eq!(wallet.list().await.unwrap().len(), 2);
    assert!(wallet.find_by_id("test1").await.unwrap().is_none());
}

#[tokio::test]
async fn test_flow_in_memory() {
    credential_flow(CredentialWallet::in_memory()).await;
}

#[tokio::test]
async fn test_flow_in_memory_data_source() {
    let storage = CredentialStorage::new(InMemoryDataSource::<Credential>::new());
    credential_flow(CredentialWallet::new(storage)).await;
}

#[tokio::test]
async fn test_flow_key_value_store() {
    let store = Arc::new(MemoryKeyValueStore::new());
    let storage = CredentialStorage::with_key_value_store(Arc::clone(&store));
    credential_flow(CredentialWallet::new(storage)).await;

    // Everything lives under the single credential namespace
    assert_eq!(store.len(), 1);
    assert!(store
        .get_item(CredentialStorage::STORAGE_KEY)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn test_flow_file_store() {
    let dir = temp_dir("credvault-flow");
    let store = FileKeyValueStore::open(&dir).unwrap();
    credential_flow(CredentialWallet::new(CredentialStorage::with_key_value_store(
        store,
    )))
    .await;
    std::fs::remove_dir_all(&dir).ok();
}

#[cfg(feature = "rocksdb")]
#[tokio::test]
async fn test_flow_rocksdb() {
    let dir = temp_dir("credvault-flow-rocks");
    let storage = CredentialStorage::with_rocksdb(&dir).unwrap();
    credential_flow(CredentialWallet::new(storage)).await;
    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = temp_dir("credvault-reopen");
    {
        let store = FileKeyValueStore::open(&dir).unwrap();
        let wallet = CredentialWallet::new(CredentialStorage::with_key_value_store(store));
        wallet.save_all(vec![cred1(), cred2(), cred3()]).await.unwrap();
        wallet.remove("test2").await.unwrap();
    }

    let store = FileKeyValueStore::open(&dir).unwrap();
    let wallet = CredentialWallet::new(CredentialStorage::with_key_value_store(store));
    let ids: Vec<String> = wallet
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec!["test1", "test3"]);
    assert_eq!(wallet.find_by_id("test3").await.unwrap(), Some(cred3()));

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_query_result_is_stable_subset() {
    let wallet = CredentialWallet::in_memory();
    wallet.save_all(vec![cred1(), cred2(), cred3()]).await.unwrap();
    let all = ids(&wallet.list().await.unwrap());

    let queries = vec![
        json!({}),
        json!({ "allowedIssuers": ["issuer1"] }),
        json!({ "allowedIssuers": [] }),
        json!({ "subjectConditions": { "birthday": { "$gt": 20000101, "$lt": 20000103 } } }),
        json!({ "subjectConditions": { "missingField": { "$nin": [1] } } }),
        json!({ "subjectConditions": { "missingField": 1 } }),
    ];

    for query in queries {
        let first = wallet.find_by_json_query(&query).await.unwrap();
        let second = wallet.find_by_json_query(&query).await.unwrap();
        assert_eq!(first, second, "query: {}", query);
        assert!(sorted_ids(&first).iter().all(|id| all.contains(id)));
    }

    let between = wallet
        .find_by_json_query(&json!({
            "subjectConditions": { "birthday": { "$gt": 20000101, "$lt": 20000103 } }
        }))
        .await
        .unwrap();
    assert_eq!(ids(&between), ids(&[cred2()]));

    let none = wallet
        .find_by_json_query(&json!({ "allowedIssuers": [] }))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_validation_error_regardless_of_contents() {
    let wallet = CredentialWallet::in_memory();
    let err = wallet
        .find_by_json_query(&json!({
            "allowedIssuers": ["*"],
            "subjectConditions": { "countryCode": { "$custom": [11, 111] } }
        }))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "not defined comparator: $custom");
}

#[tokio::test]
async fn test_corrupt_backend_error_propagates() {
    let store = Arc::new(MemoryKeyValueStore::new());
    store
        .set_item(CredentialStorage::STORAGE_KEY, "{broken".into())
        .await
        .unwrap();
    let wallet = CredentialWallet::new(CredentialStorage::with_key_value_store(store));

    assert!(matches!(
        wallet.list().await,
        Err(WalletError::Storage(StorageError::Serialization(_)))
    ));
    assert!(matches!(
        wallet.find_by_id("test1").await,
        Err(WalletError::Storage(StorageError::Serialization(_)))
    ));
}
