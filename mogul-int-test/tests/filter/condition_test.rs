use bson::oid::ObjectId;
use bson::{doc, Bson};
use mogul::errors::ErrorKind;
use mogul::{Condition, Predicates};

#[test]
fn test_entries_follow_call_order() {
    let expression = Condition::new()
        .eq("a", 1)
        .gt("b", 2)
        .eq("c", 3)
        .filters()
        .unwrap();

    let keys: Vec<&str> = expression.entries().iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
    assert_eq!(
        expression.to_document(),
        doc! { "a": 1, "b": { "$gt": 2 }, "c": 3 }
    );
}

#[test]
fn test_first_error_stays_latched() {
    let condition = Condition::new().id("not-a-valid-hex").eq("a", 1);
    let first = condition.filters().unwrap_err();
    assert_eq!(first.kind(), &ErrorKind::InvalidId);

    let condition = condition
        .id(ObjectId::from_bytes([0; 12]))
        .filter_by(&Bson::Int32(4))
        .lt("b", 2);
    let again = condition.filters().unwrap_err();
    assert_eq!(again, first);
}

#[test]
fn test_clone_forks_the_chain() {
    let original = Condition::new().eq("a", 1);
    let fork = original.clone().eq("x", 1);

    assert_eq!(original.filters().unwrap().to_document(), doc! { "a": 1 });
    assert_eq!(
        fork.filters().unwrap().to_document(),
        doc! { "a": 1, "x": 1 }
    );
}

#[test]
fn test_composers_nest() {
    let condition =
        Condition::new().or(Condition::new().and(Condition::new().eq("a", 1).eq("b", 2)));
    assert_eq!(
        condition.filters().unwrap().to_document(),
        doc! { "$or": [ { "$and": [ { "a": 1 }, { "b": 2 } ] } ] }
    );
}

#[test]
fn test_nested_error_surfaces_at_root() {
    let condition = Condition::new().eq("ok", true).nor(
        Condition::new().or(Condition::new().and(Condition::new().id("bad"))),
    );
    assert_eq!(condition.filters().unwrap_err().kind(), &ErrorKind::InvalidId);
}

#[test]
fn test_identifier_inputs() {
    let oid = ObjectId::new();
    let from_hex = Condition::new().id(oid.to_hex()).filters().unwrap();
    let from_oid = Condition::new().id(oid).filters().unwrap();
    assert_eq!(from_hex.to_document(), from_oid.to_document());
    assert_eq!(from_oid.to_document(), doc! { "_id": oid });

    let nil = Condition::new().id("000000000000000000000000").filters();
    assert_eq!(nil.unwrap_err().kind(), &ErrorKind::InvalidId);
}

#[test]
fn test_array_view_of_expression() {
    let expression = Condition::new()
        .in_array("tag", vec!["x", "y"])
        .exists("deleted_at", false)
        .filters()
        .unwrap();
    assert_eq!(
        expression.to_array(),
        vec![
            Bson::Document(doc! { "tag": { "$in": ["x", "y"] } }),
            Bson::Document(doc! { "deleted_at": { "$exists": false } }),
        ]
    );
}
