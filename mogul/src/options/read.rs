use std::time::Duration;

use bson::Document;

use super::{Collation, Hint};

/// Options for `find` and `find_one`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// Sort specification, `{field: 1 | -1}` in key order
    pub sort: Option<Document>,
    pub limit: Option<i64>,
    pub skip: Option<u64>,
    pub projection: Option<Document>,
    pub collation: Option<Collation>,
    pub hint: Option<Hint>,
    pub max_time: Option<Duration>,
    pub batch_size: Option<u32>,
    pub allow_disk_use: Option<bool>,
}

/// Options for `count_documents`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CountOptions {
    pub limit: Option<u64>,
    pub skip: Option<u64>,
    pub collation: Option<Collation>,
    pub hint: Option<Hint>,
    pub max_time: Option<Duration>,
}

/// Options for `distinct`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistinctOptions {
    pub collation: Option<Collation>,
    pub max_time: Option<Duration>,
}

/// Options for `aggregate`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateOptions {
    pub allow_disk_use: Option<bool>,
    pub batch_size: Option<u32>,
    pub collation: Option<Collation>,
    pub hint: Option<Hint>,
    pub max_time: Option<Duration>,
}
