use bson::{doc, Bson};
use mogul::errors::ErrorKind;
use mogul::{Condition, Predicates};
use mogul_int_test::test_util::{cleanup, create_test_context, run_test};
use std::collections::{BTreeMap, HashMap};

use crate::models::{sample_people, Coordinates, Location, Person};

#[test]
fn test_zero_fields_are_skipped() {
    let probe = Person {
        first_name: "Ann".into(),
        age: 0,
        ..Default::default()
    };
    let expression = Condition::new().filter_by(&probe).filters().unwrap();
    assert_eq!(
        expression.entries(),
        &[("first_name".to_string(), Bson::String("Ann".into()))]
    );
}

#[test]
fn test_nested_struct_becomes_dotted_key() {
    let probe = Person {
        location: Location {
            city: "NYC".into(),
            ..Default::default()
        },
        ..Default::default()
    };
    let expression = Condition::new().filter_by(&probe).filters().unwrap();
    assert_eq!(
        expression.entries(),
        &[("location.city".to_string(), Bson::String("NYC".into()))]
    );
}

#[test]
fn test_nesting_at_any_depth() {
    let probe = Person {
        location: Location {
            coordinates: Coordinates { lat: 40.7, lng: 0.0 },
            ..Default::default()
        },
        ..Default::default()
    };
    let expression = Condition::new().filter_by(&probe).filters().unwrap();
    assert_eq!(
        expression.to_document(),
        doc! { "location.coordinates.lat": 40.7 }
    );
}

#[test]
fn test_arrays_and_dash_tags_never_filter() {
    let probe = Person {
        tags: vec!["vip".into()],
        nickname: "annie".into(),
        ..Default::default()
    };
    let expression = Condition::new().filter_by(&probe).filters().unwrap();
    assert!(expression.is_empty());
}

#[test]
fn test_maps_are_filter_sources() {
    let mut map = HashMap::new();
    map.insert("age".to_string(), 31);
    let expression = Condition::new().filter_by(&map).filters().unwrap();
    assert_eq!(expression.to_document(), doc! { "age": 31 });

    let mut sorted = BTreeMap::new();
    sorted.insert("a".to_string(), "x");
    sorted.insert("b".to_string(), "y");
    let expression = Condition::new().filter_by(&sorted).filters().unwrap();
    assert_eq!(expression.to_document(), doc! { "a": "x", "b": "y" });
}

#[test]
fn test_scalar_filter_source_is_rejected() {
    let err = Condition::new()
        .filter_by(&Bson::String("ann".into()))
        .filters()
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::InvalidFilterSource);
}

#[test]
fn test_struct_filter_against_store() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let probe = Person {
                last_name: "Lee".into(),
                location: Location {
                    city: "NYC".into(),
                    ..Default::default()
                },
                ..Default::default()
            };
            let found = client.find_all(&probe)?;
            assert_eq!(found.len(), 2);

            let call = ctx.store().last_call().unwrap();
            assert_eq!(call.operation, "find");
            assert_eq!(
                call.filter,
                Some(doc! { "last_name": "Lee", "location.city": "NYC" })
            );
            Ok(())
        },
        cleanup,
    )
}
