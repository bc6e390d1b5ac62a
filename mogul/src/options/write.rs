use std::time::Duration;

use bson::Document;

use super::{Collation, Hint, ReturnDocument};

/// Options for `update_one`, `update_many` and `replace_one`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    /// Insert a document built from the filter and the update when nothing matches
    pub upsert: Option<bool>,
    pub array_filters: Option<Vec<Document>>,
    pub collation: Option<Collation>,
    pub hint: Option<Hint>,
    pub bypass_document_validation: Option<bool>,
}

/// Options for `delete_one` and `delete_many`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteOptions {
    pub collation: Option<Collation>,
    pub hint: Option<Hint>,
}

/// Options for `insert_one`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertOneOptions {
    pub bypass_document_validation: Option<bool>,
}

/// Options for `insert_many`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertManyOptions {
    /// Stop at the first failed insert when `true` (the default)
    pub ordered: Option<bool>,
    pub bypass_document_validation: Option<bool>,
}

/// Options for `bulk_write`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkWriteOptions {
    pub ordered: Option<bool>,
    pub bypass_document_validation: Option<bool>,
}

/// Options for `find_one_and_update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOneAndUpdateOptions {
    pub sort: Option<Document>,
    pub projection: Option<Document>,
    pub upsert: Option<bool>,
    pub return_document: Option<ReturnDocument>,
    pub array_filters: Option<Vec<Document>>,
    pub collation: Option<Collation>,
    pub hint: Option<Hint>,
    pub bypass_document_validation: Option<bool>,
    pub max_time: Option<Duration>,
}

/// Options for `find_one_and_replace`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOneAndReplaceOptions {
    pub sort: Option<Document>,
    pub projection: Option<Document>,
    pub upsert: Option<bool>,
    pub return_document: Option<ReturnDocument>,
    pub collation: Option<Collation>,
    pub hint: Option<Hint>,
    pub bypass_document_validation: Option<bool>,
    pub max_time: Option<Duration>,
}

/// Options for `find_one_and_delete`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOneAndDeleteOptions {
    pub sort: Option<Document>,
    pub projection: Option<Document>,
    pub collation: Option<Collation>,
    pub hint: Option<Hint>,
    pub max_time: Option<Duration>,
}
