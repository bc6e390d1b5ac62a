use mogul::errors::ErrorKind;
use mogul::model::Model;
use mogul::options::IndexModel;
use mogul_int_test::test_util::{cleanup, create_test_context, run_test, TEST_DATABASE};
use mogul::store::Namespace;

use crate::models::{Person, StockItem};

#[test]
fn test_declared_indexes() {
    let indexes = StockItem::indexes();
    assert_eq!(indexes.len(), 2);
    assert!(indexes[0].is_unique());
    assert_eq!(indexes[1].index_name(), "warehouse_1_qty_-1");
    assert_eq!(Person::indexes()[0].index_name(), "email_unique");
}

#[test]
fn test_ensure_indexes_enforces_uniqueness() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            let names = client.ensure_indexes::<Person>()?;
            assert_eq!(names, vec!["email_unique".to_string()]);

            client.insert_one(&Person::new("Ann", "Lee", 31, "NYC"))?;
            let err = client
                .insert_one(&Person::new("Ann", "Lee", 40, "LA"))
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::DuplicateKey);
            Ok(())
        },
        cleanup,
    )
}

#[test]
fn test_create_and_drop_indexes() {
    run_test(
        create_test_context,
        |ctx| {
            let client = ctx.client();
            let ns = Namespace::new(TEST_DATABASE, "stock_item");

            client.create_indexes::<StockItem>(vec![
                IndexModel::from_fields(&["qty"], false).with_name("by_qty"),
            ])?;
            client.ensure_indexes::<StockItem>()?;
            assert_eq!(
                ctx.store().memory().index_names(&ns),
                vec!["_id_", "by_qty", "sku_1", "warehouse_1_qty_-1"]
            );

            client.drop_index::<StockItem>("by_qty")?;
            assert_eq!(ctx.store().memory().index_names(&ns).len(), 3);

            let err = client.drop_index::<StockItem>("_id_").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::InvalidOperation);

            client.drop_indexes::<StockItem>()?;
            assert_eq!(ctx.store().memory().index_names(&ns), vec!["_id_"]);
            Ok(())
        },
        cleanup,
    )
}
