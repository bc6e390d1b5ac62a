use bson::Bson;
use mogul::errors::ErrorKind;
use mogul::{Client, Predicates};
use mogul_int_test::test_util::{cleanup, create_test_context, run_test, RecordingStore};

use crate::models::{sample_people, Person};

#[test]
fn test_soft_delete_issues_an_update() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let result = client
                .session()
                .eq("first_name", "Ann")
                .soft_delete_one::<Person>()?;
            assert_eq!(result.modified_count, 1);

            let call = ctx.store().last_call().unwrap();
            assert_eq!(call.operation, "update_one");
            let set = call.update.unwrap();
            let stamped = set.get_document("$set").unwrap().get("deleted_at");
            assert!(matches!(stamped, Some(Bson::DateTime(_))));

            assert!(!ctx.store().operations().contains(&"delete_one"));
            assert_eq!(ctx.store().documents("people").len(), 4);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_soft_deleted_documents_are_hidden_by_soft_false() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;
            client
                .session()
                .eq("last_name", "Lee")
                .soft_delete_many::<Person>()?;

            let err = client
                .session()
                .eq("first_name", "Ann")
                .soft(false)
                .find_one::<Person>()
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NoDocuments);

            // no implicit filter without soft()
            let ann: Person = client.session().eq("first_name", "Ann").find_one()?;
            assert!(ann.deleted_at.is_some());

            let removed: Vec<Person> = client.session().soft(true).find_all()?;
            assert_eq!(removed.len(), 2);
            assert_eq!(client.session().soft(false).count::<Person>()?, 2);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_custom_soft_delete_field() {
    let store = RecordingStore::new();
    let client = Client::builder()
        .soft_delete_field("removed_at")
        .build(store.clone())
        .unwrap();
    client.insert_many(&sample_people()).unwrap();

    client
        .session()
        .eq("first_name", "Bob")
        .soft_delete_one::<Person>()
        .unwrap();
    assert_eq!(client.session().soft(true).count::<Person>().unwrap(), 1);

    let call = store.last_call().unwrap();
    assert_eq!(
        call.filter.unwrap().get_document("removed_at").unwrap().get_bool("$exists").ok(),
        Some(true)
    );
}
