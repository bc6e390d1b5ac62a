use mogul::errors::ErrorKind;
use mogul::{Client, NamingConvention, Predicates};
use mogul_int_test::test_util::RecordingStore;
use std::time::Duration;

use crate::models::UserAccount;

#[test]
fn test_builder_applies_settings() {
    let store = RecordingStore::new();
    let client = Client::builder()
        .database("accounts")
        .naming(NamingConvention::identity())
        .default_timeout(Duration::from_secs(5))
        .build(store.clone())
        .unwrap();

    assert_eq!(client.config().database(), "accounts");
    assert_eq!(client.config().default_timeout(), Some(Duration::from_secs(5)));

    client
        .insert_one(&UserAccount {
            login: "root".into(),
            active: true,
        })
        .unwrap();
    let call = store.last_call().unwrap();
    assert_eq!(call.namespace.database, "accounts");
    assert_eq!(call.namespace.collection, "UserAccount");
}

#[test]
fn test_builder_reports_first_error() {
    let err = Client::builder()
        .database("")
        .soft_delete_field("")
        .build(RecordingStore::new())
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ValidationError);
    assert_eq!(err.message(), "database name cannot be empty");
}

#[test]
fn test_session_database_override() {
    let store = RecordingStore::new();
    let client = Client::builder().build(store.clone()).unwrap();
    client
        .session()
        .database("audit")
        .eq("login", "root")
        .count::<UserAccount>()
        .unwrap();
    let call = store.last_call().unwrap();
    assert_eq!(call.namespace.database, "audit");
    assert_eq!(call.namespace.collection, "user_account");
}

#[test]
fn test_renamed_fields_use_storage_names() {
    let store = RecordingStore::new();
    let client = Client::builder().build(store.clone()).unwrap();
    client
        .insert_one(&UserAccount {
            login: "a".into(),
            active: true,
        })
        .unwrap();

    let probe = UserAccount {
        active: true,
        ..Default::default()
    };
    assert_eq!(client.count(&probe).unwrap(), 1);
    assert_eq!(
        store.last_call().unwrap().filter,
        Some(bson::doc! { "active_flag": true })
    );
}
