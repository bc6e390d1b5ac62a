use mogul::errors::ErrorKind;
use mogul::{Client, NameResolver, NamingConvention};
use mogul_int_test::test_util::RecordingStore;
use std::thread;

use crate::models::{Person, StockItem, TenantOrder, UserAccount};

#[test]
fn test_convention_names() {
    let resolver = NameResolver::default();
    assert_eq!(
        resolver.resolve_type::<UserAccount>().unwrap().name(),
        "user_account"
    );
    assert_eq!(resolver.resolve_type::<StockItem>().unwrap().name(), "stock_item");

    let lower = NameResolver::new(NamingConvention::lower_case());
    assert_eq!(lower.resolve_type::<UserAccount>().unwrap().name(), "useraccount");
}

#[test]
fn test_repeated_resolution_is_stable() {
    let resolver = NameResolver::default();
    let first = resolver.resolve_type::<Person>().unwrap();
    let second = resolver.resolve_type::<Person>().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.name(), "people");
    assert_eq!(resolver.cached_name::<Person>(), Some("people".to_string()));
}

#[test]
fn test_custom_name_wins_over_cache() {
    let resolver = NameResolver::default();
    assert_eq!(resolver.resolve_type::<TenantOrder>().unwrap().name(), "orders");

    let order = TenantOrder {
        tenant: "acme".into(),
        total: 1,
    };
    assert_eq!(resolver.resolve(&order).unwrap().name(), "orders_acme");
    assert_eq!(resolver.resolve(&order).unwrap().name(), "orders_acme");
    assert_eq!(resolver.cached_name::<TenantOrder>(), Some("orders".to_string()));
}

#[test]
fn test_slices_and_maps_resolve_their_element_type() {
    let resolver = NameResolver::default();
    let accounts = vec![UserAccount::default()];
    assert_eq!(resolver.resolve_slice(&accounts).unwrap().name(), "user_account");

    let mut map = std::collections::HashMap::new();
    map.insert(1, Person::default());
    let descriptor = resolver.resolve_map(&map).unwrap();
    assert_eq!(descriptor.name(), "people");
    assert_eq!(descriptor.type_name(), "Person");
}

#[test]
fn test_empty_convention_result_is_rejected() {
    let resolver = NameResolver::new(NamingConvention::new(|_| String::new()));
    let err = resolver.resolve_type::<UserAccount>().unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidCollectionName);
}

#[test]
fn test_concurrent_resolution() {
    let client = Client::builder().build(RecordingStore::new()).unwrap();
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            thread::spawn(move || {
                (0..100)
                    .map(|_| client.collection_name::<Person>().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let names = handle.join().unwrap();
        assert!(names.iter().all(|name| name == "people"));
    }
}

#[test]
fn test_clients_do_not_share_caches() {
    let one = Client::builder().build(RecordingStore::new()).unwrap();
    let two = Client::builder().build(RecordingStore::new()).unwrap();
    one.collection_name::<Person>().unwrap();
    assert!(one.resolver().cached_name::<Person>().is_some());
    assert!(two.resolver().cached_name::<Person>().is_none());
}
