use bson::doc;
use mogul::errors::ErrorKind;
use mogul::options::ReturnDocument;
use mogul::store::WriteModel;
use mogul::{Condition, Context, Predicates};
use mogul_int_test::test_util::{cleanup, create_test_context, is_sorted, run_test};

use crate::models::{sample_people, Person, TenantOrder};

#[test]
fn test_find_with_chained_predicates() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let people: Vec<Person> = client
                .session()
                .eq("last_name", "Lee")
                .gt("age", 30)
                .sort(["-age"])
                .find_all()?;
            let ages: Vec<i32> = people.iter().map(|p| p.age).collect();
            assert_eq!(ages, vec![47, 31]);
            assert!(is_sorted(ages, false));

            let call = ctx.store().last_call().unwrap();
            assert_eq!(call.namespace.collection, "people");
            assert_eq!(
                call.filter,
                Some(doc! { "last_name": "Lee", "age": { "$gt": 30 } })
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_latched_error_skips_the_store() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            let err = client
                .session()
                .eq("last_name", "Lee")
                .id("xyz")
                .find_all::<Person>()
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidId);

            let err = client
                .session()
                .or(Condition::new().id("xyz"))
                .update_many_with::<Person>(doc! { "$set": { "age": 1 } })
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidId);

            assert!(ctx.store().calls().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_by_struct_builds_set_document() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let change = Person {
                first_name: "Bob".into(),
                last_name: "Stone".into(),
                ..Default::default()
            };
            client
                .session()
                .eq("first_name", "Bob")
                .update_one(&change)?;

            let call = ctx.store().last_call().unwrap();
            assert_eq!(call.operation, "update_one");
            assert_eq!(
                call.update,
                Some(doc! {
                    "$set": {
                        "first_name": "Bob",
                        "last_name": "Stone",
                        "tags": [],
                        "location": {
                            "city": "",
                            "coordinates": { "lat": 0.0, "lng": 0.0 },
                        },
                        "nickname": "",
                    }
                })
            );

            let bob: Person = client.session().eq("first_name", "Bob").find_one()?;
            assert_eq!(bob.age, 25);
            assert_eq!(bob.location.city, "");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_zero_update_is_not_sent() {
    run_test(
        create_test_context,
        |ctx| {
            let result = ctx.client().session().update_many(&Person::default())?;
            assert_eq!(result.matched_count, 0);
            assert!(ctx.store().calls().is_empty());
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_find_one_and_update_returns_requested_version() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let before: Person = client
                .session()
                .eq("first_name", "Dee")
                .find_one_and_update(doc! { "$inc": { "age": 1 } })?;
            assert_eq!(before.age, 19);

            let after: Person = client
                .session()
                .eq("first_name", "Dee")
                .set_return_document(ReturnDocument::After)
                .find_one_and_update(doc! { "$inc": { "age": 1 } })?;
            assert_eq!(after.age, 21);

            let missing = client
                .session()
                .eq("first_name", "Zed")
                .find_one_and_update::<Person>(doc! { "$inc": { "age": 1 } })
                .unwrap_err();
            assert_eq!(missing.kind(), &ErrorKind::NoDocuments);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_replace_and_upsert() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let mut ann: Person = client.session().eq("first_name", "Ann").find_one()?;
            ann.age = 32;
            ann.id = None;
            let result = client.session().eq("first_name", "Ann").replace_one(&ann)?;
            assert_eq!(result.modified_count, 1);

            let eve = Person::new("Eve", "Moss", 28, "Denver");
            let result = client.session().eq("first_name", "Eve").upsert(&eve)?;
            assert!(result.upserted_id.is_some());
            assert_eq!(client.session().count::<Person>()?, 5);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_distinct_and_count() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let mut names: Vec<String> = client
                .session()
                .distinct::<Person>("last_name")?
                .into_iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect();
            names.sort();
            assert_eq!(names, vec!["Lee", "Park", "Stone"]);

            let count = client
                .session()
                .in_array("location.city", vec!["NYC", "Austin"])
                .count::<Person>()?;
            assert_eq!(count, 3);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_bulk_write() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let result = client.session().bulk_write::<Person>(vec![
                WriteModel::UpdateMany {
                    filter: doc! { "last_name": "Lee" },
                    update: doc! { "$set": { "location.city": "LA" } },
                    upsert: None,
                },
                WriteModel::DeleteOne {
                    filter: doc! { "first_name": "Dee" },
                },
            ])?;
            assert_eq!(result.modified_count, 2);
            assert_eq!(result.deleted_count, 1);
            assert_eq!(ctx.store().operations().last(), Some(&"bulk_write"));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_value_named_collections() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            let order = TenantOrder {
                tenant: "acme".into(),
                total: 12,
            };
            client.session().insert_one(&order)?;
            assert_eq!(ctx.store().documents("orders_acme").len(), 1);

            // reads without a value use the type-level name
            assert_eq!(client.session().count::<TenantOrder>()?, 0);
            let count = client
                .session()
                .collection(&order)
                .count::<TenantOrder>()?;
            assert_eq!(count, 1);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_expired_context() {
    run_test(
        create_test_context,
        |ctx| {
            let expired = Context::with_timeout(std::time::Duration::from_nanos(1));
            std::thread::sleep(std::time::Duration::from_millis(2));
            let err = ctx
                .client()
                .session()
                .with_context(expired)
                .count::<Person>()
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::Timeout);
            Ok(())
        },
        cleanup,
    )
}
