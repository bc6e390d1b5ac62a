use bson::doc;
use mogul::errors::ErrorKind;
use mogul::Predicates;
use mogul_int_test::test_util::{cleanup, create_test_context, run_test};

use crate::models::{Account, Counter, Tier};

fn ann() -> Account {
    Account {
        first_name: "ann".into(),
        login_count: 1,
        tier: Some(Tier::Basic),
    }
}

#[test]
fn test_rename_all_matches_stored_keys() {
    run_test(
        create_test_context,
        |ctx| {
            ctx.client().insert_one(&ann())?;
            let mut stored = ctx.store().documents("account").remove(0);
            stored.remove("_id");
            assert_eq!(
                stored,
                doc! { "firstName": "ann", "loginCount": 1i64, "tier": "Basic" }
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_update_by_struct_uses_renamed_keys() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_one(&ann())?;

            let result = client
                .session()
                .eq("firstName", "ann")
                .update_one(&Account {
                    login_count: 7,
                    tier: Some(Tier::Gold),
                    ..Default::default()
                })?;
            assert_eq!(result.matched_count, 1);
            assert_eq!(result.modified_count, 1);
            assert_eq!(
                ctx.store().last_call().unwrap().update,
                Some(doc! { "$set": { "loginCount": 7i64, "tier": "Gold" } })
            );

            let found: Account = client.session().eq("firstName", "ann").find_one()?;
            assert_eq!(
                found,
                Account {
                    first_name: "ann".into(),
                    login_count: 7,
                    tier: Some(Tier::Gold),
                }
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_serde_field_filters_by_encoded_value() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            client.insert_one(&ann())?;
            client.insert_one(&Account {
                first_name: "bob".into(),
                login_count: 3,
                tier: Some(Tier::Gold),
            })?;

            let gold = client.find_all(&Account {
                tier: Some(Tier::Gold),
                ..Default::default()
            })?;
            assert_eq!(gold.len(), 1);
            assert_eq!(gold[0].first_name, "bob");
            assert_eq!(
                ctx.store().last_call().unwrap().filter,
                Some(doc! { "tier": "Gold" })
            );
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_out_of_range_values_never_reach_the_store() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            let big = Counter { hits: u64::MAX };

            let err = client.find_all(&big).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);

            let err = client
                .session()
                .eq("hits", 1)
                .update_one(&big)
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);

            let err = client.insert_one(&big).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::EncodingError);

            assert!(ctx.store().calls().is_empty());
            Ok(())
        },
        cleanup,
    )
}
