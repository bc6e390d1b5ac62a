use bson::{doc, Bson, Document, Regex};

use super::{Condition, FilterSource, IdInput};
use crate::common::*;

/// The chainable predicate surface shared by [`Condition`] and
/// [`Session`](crate::session::Session).
///
/// Every method appends to the underlying condition and returns the
/// builder. Failures are latched on the condition instead of being
/// returned, so chains never break; see [`Condition::filters`].
pub trait Predicates: Sized {
    /// The condition the predicates append to.
    fn condition_mut(&mut self) -> &mut Condition;

    /// Field used by [`soft`](Predicates::soft).
    fn soft_delete_field(&self) -> &str {
        DELETED_AT
    }

    /// `{key: value}`
    fn eq<V: Into<Bson>>(mut self, key: &str, value: V) -> Self {
        self.condition_mut().push(key, value.into());
        self
    }

    /// `{key: {$ne: value}}`
    fn ne<V: Into<Bson>>(self, key: &str, value: V) -> Self {
        self.operator(key, OP_NE, value.into())
    }

    /// `{key: {$gt: value}}`
    fn gt<V: Into<Bson>>(self, key: &str, value: V) -> Self {
        self.operator(key, OP_GT, value.into())
    }

    /// `{key: {$gte: value}}`
    fn gte<V: Into<Bson>>(self, key: &str, value: V) -> Self {
        self.operator(key, OP_GTE, value.into())
    }

    /// `{key: {$lt: value}}`
    fn lt<V: Into<Bson>>(self, key: &str, value: V) -> Self {
        self.operator(key, OP_LT, value.into())
    }

    /// `{key: {$lte: value}}`
    fn lte<V: Into<Bson>>(self, key: &str, value: V) -> Self {
        self.operator(key, OP_LTE, value.into())
    }

    /// `{key: {$in: [values...]}}`
    fn in_array<I, V>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        let values: Vec<Bson> = values.into_iter().map(Into::into).collect();
        self.operator(key, OP_IN, Bson::Array(values))
    }

    /// `{key: {$nin: [values...]}}`
    fn not_in_array<I, V>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Bson>,
    {
        let values: Vec<Bson> = values.into_iter().map(Into::into).collect();
        self.operator(key, OP_NIN, Bson::Array(values))
    }

    /// `{key: {$not: expr}}`, where `expr` is an operator document or a
    /// regular expression.
    fn not<V: Into<Bson>>(self, key: &str, expr: V) -> Self {
        self.operator(key, OP_NOT, expr.into())
    }

    /// `{key: {$exists: present}}`
    fn exists(self, key: &str, present: bool) -> Self {
        self.operator(key, OP_EXISTS, Bson::Boolean(present))
    }

    /// `{key: {$exists: present, <entries of every sub-condition>}}`
    ///
    /// The entries of the sub-conditions become siblings of `$exists` in
    /// the same operator document, so they are expected to be operator
    /// entries themselves. A failed sub-condition latches its error and
    /// nothing is appended.
    ///
    /// # Arguments
    ///
    /// * `key` - The field tested for presence
    /// * `present` - Whether the field must exist
    /// * `subs` - Conditions merged into the operator document
    fn exists_with<I>(mut self, key: &str, present: bool, subs: I) -> Self
    where
        I: IntoIterator<Item = Condition>,
    {
        let mut operators = doc! { OP_EXISTS: present };
        for sub in subs {
            match sub.filters() {
                Ok(expression) => {
                    for (sub_key, value) in expression.into_entries() {
                        operators.insert(sub_key, value);
                    }
                }
                Err(err) => {
                    self.condition_mut().latch(err);
                    return self;
                }
            }
        }
        self.condition_mut().push(key, Bson::Document(operators));
        self
    }

    /// Case-insensitive match in operator form:
    /// `{key: {$regex: pattern, $options: "i"}}`.
    fn regex(mut self, key: &str, pattern: &str) -> Self {
        let value = doc! { OP_REGEX: pattern, OP_OPTIONS: CASE_INSENSITIVE };
        self.condition_mut().push(key, Bson::Document(value));
        self
    }

    /// Case-insensitive match as a regular-expression literal: `{key: /pattern/i}`.
    fn regex_filter(mut self, key: &str, pattern: &str) -> Self {
        let value = Bson::RegularExpression(Regex {
            pattern: pattern.to_string(),
            options: CASE_INSENSITIVE.to_string(),
        });
        self.condition_mut().push(key, value);
        self
    }

    /// `{key: {$type: spec}}`, `spec` being a type alias, a type code or an
    /// array of either.
    fn of_type<V: Into<Bson>>(self, key: &str, spec: V) -> Self {
        self.operator(key, OP_TYPE, spec.into())
    }

    /// `{$expr: [<entries of sub>]}`
    fn expr(self, sub: Condition) -> Self {
        self.compose(OP_EXPR, sub)
    }

    /// `{$and: [<entries of sub>]}`
    fn and(self, sub: Condition) -> Self {
        self.compose(OP_AND, sub)
    }

    /// `{$or: [<entries of sub>]}`
    fn or(self, sub: Condition) -> Self {
        self.compose(OP_OR, sub)
    }

    /// `{$nor: [<entries of sub>]}`
    fn nor(self, sub: Condition) -> Self {
        self.compose(OP_NOR, sub)
    }

    /// `{_id: <object id>}`; a malformed or nil identifier is latched as
    /// an `InvalidId` error.
    fn id<I: Into<IdInput>>(mut self, id: I) -> Self {
        match id.into().object_id() {
            Ok(oid) => self.condition_mut().push(DOC_ID, Bson::ObjectId(oid)),
            Err(err) => self.condition_mut().latch(err),
        }
        self
    }

    /// One equality per populated, filter-tagged field of a model, or per
    /// entry of a map.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let probe = Person { name: "ann".into(), ..Default::default() };
    /// // {name: "ann"}; zero fields contribute nothing
    /// let condition = Condition::new().filter_by(&probe);
    /// ```
    fn filter_by<S: FilterSource + ?Sized>(mut self, source: &S) -> Self {
        match source.filter_entries() {
            Ok(entries) => {
                let condition = self.condition_mut();
                for (key, value) in entries {
                    condition.push(&key, value);
                }
            }
            Err(err) => self.condition_mut().latch(err),
        }
        self
    }

    /// Appends raw pairs verbatim, for operator syntax the other
    /// predicates do not cover.
    fn filter_bson<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Bson>,
    {
        let condition = self.condition_mut();
        for (key, value) in pairs {
            condition.push(key.as_ref(), value.into());
        }
        self
    }

    /// `{<soft delete field>: {$exists: present}}`: `soft(false)` hides
    /// soft-deleted documents, `soft(true)` selects only them.
    fn soft(self, present: bool) -> Self {
        let field = self.soft_delete_field().to_string();
        self.exists(&field, present)
    }

    /// Appends every entry of another condition, latching its error.
    fn with_condition(mut self, other: Condition) -> Self {
        let latched = other.error().cloned();
        match latched {
            Some(err) => self.condition_mut().latch(err),
            None => {
                if let Ok(expression) = other.filters() {
                    let condition = self.condition_mut();
                    for (key, value) in expression.into_entries() {
                        condition.push(&key, value);
                    }
                }
            }
        }
        self
    }

    #[doc(hidden)]
    fn operator(mut self, key: &str, op: &str, operand: Bson) -> Self {
        let mut value = Document::new();
        value.insert(op, operand);
        self.condition_mut().push(key, Bson::Document(value));
        self
    }

    #[doc(hidden)]
    fn compose(mut self, op: &str, sub: Condition) -> Self {
        match sub.filters() {
            Ok(expression) => self
                .condition_mut()
                .push(op, Bson::Array(expression.to_array())),
            Err(err) => self.condition_mut().latch(err),
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use bson::oid::ObjectId;
    use std::collections::BTreeMap;

    fn document(condition: Condition) -> Document {
        condition.filters().unwrap().to_document()
    }

    #[test]
    fn leaf_operators() {
        let condition = Condition::new()
            .ne("a", 1)
            .gte("b", 2)
            .lt("c", 3)
            .lte("d", 4.5)
            .in_array("e", vec!["x", "y"])
            .not_in_array("f", [1, 2])
            .exists("g", false)
            .of_type("h", "string");
        assert_eq!(
            document(condition),
            doc! {
                "a": { "$ne": 1 },
                "b": { "$gte": 2 },
                "c": { "$lt": 3 },
                "d": { "$lte": 4.5 },
                "e": { "$in": ["x", "y"] },
                "f": { "$nin": [1, 2] },
                "g": { "$exists": false },
                "h": { "$type": "string" },
            }
        );
    }

    #[test]
    fn composers_nest_in_order() {
        let condition = Condition::new().or(Condition::new().and(Condition::new().eq("a", 1).eq("b", 2)));
        assert_eq!(
            document(condition),
            doc! { "$or": [{ "$and": [{ "a": 1 }, { "b": 2 }] }] }
        );

        let condition = Condition::new()
            .nor(Condition::new().eq("a", 1))
            .expr(Condition::new().eq("$gt", vec!["$qty", "$limit"]));
        assert_eq!(
            document(condition),
            doc! {
                "$nor": [{ "a": 1 }],
                "$expr": [{ "$gt": ["$qty", "$limit"] }],
            }
        );
    }

    #[test]
    fn failed_sub_condition_propagates() {
        let condition = Condition::new()
            .eq("a", 1)
            .and(Condition::new().or(Condition::new().id("zz")))
            .eq("b", 2);
        let err = condition.filters().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidId);
        assert_eq!(condition.len(), 2);
    }

    #[test]
    fn not_wraps_expression() {
        let condition = Condition::new().not("age", doc! { "$gt": 5 });
        assert_eq!(document(condition), doc! { "age": { "$not": { "$gt": 5 } } });
    }

    #[test]
    fn exists_with_merges_sub_entries() {
        let condition = Condition::new().exists_with(
            "age",
            true,
            vec![Condition::new().eq("$gt", 1), Condition::new().eq("$lt", 9)],
        );
        let doc = document(condition);
        let age = doc.get_document("age").unwrap();
        assert!(age.get_bool("$exists").unwrap());
        assert_eq!(age.get_i32("$lt").unwrap(), 9);
        assert_eq!(age.get_i32("$gt").unwrap(), 1);

        let condition = Condition::new().exists_with("age", true, vec![Condition::new().id("bad")]);
        assert!(condition.filters().is_err());
        assert!(condition.is_empty());
    }

    #[test]
    fn regex_forms() {
        let condition = Condition::new().regex("name", "^an").regex_filter("city", "york$");
        let doc = document(condition);
        assert_eq!(
            doc.get_document("name").unwrap(),
            &doc! { "$regex": "^an", "$options": "i" }
        );
        match doc.get("city") {
            Some(Bson::RegularExpression(regex)) => {
                assert_eq!(regex.pattern, "york$");
                assert_eq!(regex.options, "i");
            }
            other => panic!("expected a regex literal, got {:?}", other),
        }
    }

    #[test]
    fn id_accepts_object_ids_and_hex() {
        let oid = ObjectId::new();
        let from_oid = document(Condition::new().id(oid));
        let from_hex = document(Condition::new().id(oid.to_hex()));
        assert_eq!(from_oid, doc! { "_id": oid });
        assert_eq!(from_hex, from_oid);

        let nil = Condition::new().id("000000000000000000000000");
        assert_eq!(nil.filters().unwrap_err().kind(), &ErrorKind::InvalidId);
    }

    #[test]
    fn filter_by_maps_and_rejects_scalars() {
        let mut map = BTreeMap::new();
        map.insert("city".to_string(), "NYC");
        map.insert("name".to_string(), "ann");
        assert_eq!(
            document(Condition::new().filter_by(&map)),
            doc! { "city": "NYC", "name": "ann" }
        );

        let condition = Condition::new().filter_by(&Bson::String("nope".into()));
        assert_eq!(
            condition.filters().unwrap_err().kind(),
            &ErrorKind::InvalidFilterSource
        );
    }

    #[test]
    fn filter_bson_is_verbatim() {
        let condition = Condition::new()
            .eq("a", 1)
            .filter_bson(doc! { "$where": "1", "b": { "$size": 2 } });
        assert_eq!(
            document(condition),
            doc! { "a": 1, "$where": "1", "b": { "$size": 2 } }
        );
    }

    #[test]
    fn soft_uses_deleted_at() {
        assert_eq!(
            document(Condition::new().soft(false)),
            doc! { "deleted_at": { "$exists": false } }
        );
    }

    #[test]
    fn with_condition_appends_and_latches() {
        let merged = Condition::new().eq("a", 1).with_condition(Condition::new().eq("b", 2));
        assert_eq!(document(merged), doc! { "a": 1, "b": 2 });

        let merged = Condition::new().with_condition(Condition::new().id("bad"));
        assert!(merged.filters().is_err());
    }
}
