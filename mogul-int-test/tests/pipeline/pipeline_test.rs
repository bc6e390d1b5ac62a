use bson::{doc, Document};
use mogul::errors::ErrorKind;
use mogul::{Condition, Predicates};
use mogul_int_test::test_util::{cleanup, create_test_context, run_test};
use serde::Deserialize;

use crate::models::{sample_people, Person};

#[derive(Debug, Deserialize, PartialEq)]
struct NameOnly {
    first_name: String,
}

#[test]
fn test_match_then_raw_stages() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;

            let names: Vec<NameOnly> = client
                .pipeline()
                .match_stage(Condition::new().eq("location.city", "NYC"))
                .add_stages(vec![
                    doc! { "$sort": { "age": 1 } },
                    doc! { "$project": { "first_name": 1, "_id": 0 } },
                ])
                .all::<Person, NameOnly>()?;
            assert_eq!(
                names,
                vec![
                    NameOnly {
                        first_name: "Ann".into()
                    },
                    NameOnly {
                        first_name: "Cyd".into()
                    },
                ]
            );

            let call = ctx.store().last_call().unwrap();
            assert_eq!(call.operation, "aggregate");
            assert_eq!(call.namespace.collection, "people");
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_one_with_empty_result() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx
                .client()
                .pipeline()
                .match_stage(Condition::new().eq("first_name", "Nobody"))
                .one::<Person, Document>()
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::NoDocuments);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_count_stage() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_many(&sample_people())?;
            let counted: Document = client
                .pipeline()
                .match_stage(Condition::new().gte("age", 25))
                .add_stages(vec![doc! { "$count": "n" }])
                .one::<Person, Document>()?;
            assert_eq!(counted, doc! { "n": 3 });
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_broken_condition_never_runs() {
    run_test(
        create_test_context,
        |ctx| {
            let err = ctx
                .client()
                .pipeline()
                .match_stage(Condition::new().id("nope"))
                .all::<Person, Document>()
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidId);
            assert!(ctx.store().calls().is_empty());
            Ok(())
        },
        cleanup,
    )
}
