use bson::doc;
use mogul::options::{Collation, Hint};
use mogul_int_test::test_util::{cleanup, create_test_context, run_test};
use std::time::Duration;

use crate::models::{sample_people, Person};

#[test]
fn test_sort_preserves_argument_order() {
    run_test(
        create_test_context,
        |ctx| {
            let session = ctx.client().session().sort(["b", "-a"]);
            assert_eq!(
                session.sort_pairs(),
                vec![("b".to_string(), 1), ("a".to_string(), -1)]
            );
            assert_eq!(
                session.find_options().sort,
                Some(doc! { "b": 1, "a": -1 })
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_asc_holds_every_key() {
    run_test(
        create_test_context,
        |ctx| {
            let session = ctx.client().session().asc(["b", "a"]);
            let sort = session.find_options().sort.clone().unwrap();
            assert_eq!(sort.len(), 2);
            assert_eq!(sort.get_i32("a").ok(), Some(1));
            assert_eq!(sort.get_i32("b").ok(), Some(1));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_options_reach_every_operation_kind() {
    run_test(
        create_test_context,
        |ctx| {
            let session = ctx
                .client()
                .session()
                .set_max_time(Duration::from_millis(500))
                .set_hint(Hint::Name("age_1".into()))
                .set_collation(Collation::new("fr"))
                .set_projection(doc! { "first_name": 1 })
                .set_bypass_document_validation(true)
                .set_array_filters(vec![doc! { "x.a": 1 }])
                .skip(2);

            let max_time = Some(Duration::from_millis(500));
            assert_eq!(session.find_one_and_update_options().max_time, max_time);
            assert_eq!(session.find_one_and_replace_options().max_time, max_time);
            assert_eq!(session.find_one_and_delete_options().max_time, max_time);
            assert_eq!(session.count_options().max_time, max_time);

            assert!(session.update_options().hint.is_some());
            assert!(session.delete_options().hint.is_some());
            assert!(session.distinct_options().collation.is_some());
            assert!(session.find_one_and_delete_options().projection.is_some());

            assert_eq!(session.insert_one_options().bypass_document_validation, Some(true));
            assert_eq!(session.bulk_write_options().bypass_document_validation, Some(true));
            assert!(session.update_options().array_filters.is_some());
            assert!(session.find_one_and_update_options().array_filters.is_some());

            assert_eq!(session.find_options().skip, Some(2));
            assert_eq!(session.count_options().skip, Some(2));
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_limit_skip_and_projection_apply() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let people: Vec<Person> = client
                .session()
                .sort(["age"])
                .skip(1)
                .limit(2)
                .find_all()?;
            let names: Vec<&str> = people.iter().map(|p| p.first_name.as_str()).collect();
            assert_eq!(names, vec!["Bob", "Ann"]);
            assert_eq!(client.session().limit(3).count::<Person>()?, 3);
            Ok(())
        },
        cleanup,
    )
}
