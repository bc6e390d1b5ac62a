use std::collections::HashMap;

use bson::Bson;

/// Result of `insert_one`.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOneResult {
    pub inserted_id: Bson,
}

/// Result of `insert_many`, ids keyed by input position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertManyResult {
    pub inserted_ids: HashMap<usize, Bson>,
}

/// Result of the update and replace operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResult {
    pub matched_count: u64,
    pub modified_count: u64,
    /// Id of the inserted document when an upsert found nothing to update
    pub upserted_id: Option<Bson>,
}

/// Result of the delete operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteResult {
    pub deleted_count: u64,
}

/// Aggregated counts of a bulk write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkWriteResult {
    pub inserted_count: u64,
    pub matched_count: u64,
    pub modified_count: u64,
    pub deleted_count: u64,
    pub upserted_count: u64,
    /// Ids of inserted documents keyed by write model position
    pub inserted_ids: HashMap<usize, Bson>,
    /// Ids of upserted documents keyed by write model position
    pub upserted_ids: HashMap<usize, Bson>,
}
