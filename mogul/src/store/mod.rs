//! The document store boundary.
//!
//! Everything below the session layer goes through [`DocumentStore`]: the
//! session materializes filters, options and update documents and hands
//! them to the store unchanged. A network driver adapter implements the
//! trait for a real database; [`MemoryStore`] implements it in process.

mod cursor;
mod memory;
mod results;
mod write_model;

pub use cursor::*;
pub use memory::MemoryStore;
pub use results::*;
pub use write_model::*;

use std::fmt::{Display, Formatter};

use bson::{Bson, Document};

use crate::common::Context;
use crate::errors::MogulResult;
use crate::options::{
    AggregateOptions, BulkWriteOptions, CountOptions, CreateIndexOptions, DeleteOptions,
    DistinctOptions, FindOneAndDeleteOptions, FindOneAndReplaceOptions, FindOneAndUpdateOptions,
    FindOptions, IndexModel, InsertManyOptions, InsertOneOptions, UpdateOptions,
};

/// Fully qualified collection address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace {
    pub database: String,
    pub collection: String,
}

impl Namespace {
    pub fn new(database: &str, collection: &str) -> Self {
        Namespace {
            database: database.to_string(),
            collection: collection.to_string(),
        }
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.database, self.collection)
    }
}

/// Operations a document database client offers over one collection.
///
/// Every call receives the operation [`Context`] and the target
/// [`Namespace`]. Implementations report a missing document as `Ok(None)`
/// and must surface their own failures as `MogulError`s; the layer above
/// passes them through unchanged.
///
/// # Thread Safety
///
/// Implementers must be `Send + Sync`; one store is shared by every session
/// of a client.
pub trait DocumentStore: Send + Sync {
    /// Returns a cursor over the documents matching `filter`.
    fn find(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOptions,
    ) -> MogulResult<DocumentCursor>;

    /// Returns the first document matching `filter`, if any.
    fn find_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOptions,
    ) -> MogulResult<Option<Document>>;

    fn find_one_and_update(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: FindOneAndUpdateOptions,
    ) -> MogulResult<Option<Document>>;

    fn find_one_and_replace(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        replacement: Document,
        options: FindOneAndReplaceOptions,
    ) -> MogulResult<Option<Document>>;

    fn find_one_and_delete(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOneAndDeleteOptions,
    ) -> MogulResult<Option<Document>>;

    fn insert_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        document: Document,
        options: InsertOneOptions,
    ) -> MogulResult<InsertOneResult>;

    fn insert_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        documents: Vec<Document>,
        options: InsertManyOptions,
    ) -> MogulResult<InsertManyResult>;

    fn update_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult>;

    fn update_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult>;

    fn replace_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        replacement: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult>;

    fn delete_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: DeleteOptions,
    ) -> MogulResult<DeleteResult>;

    fn delete_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: DeleteOptions,
    ) -> MogulResult<DeleteResult>;

    /// Applies a batch of write models in order.
    fn bulk_write(
        &self,
        ctx: &Context,
        ns: &Namespace,
        models: Vec<WriteModel>,
        options: BulkWriteOptions,
    ) -> MogulResult<BulkWriteResult>;

    fn count_documents(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: CountOptions,
    ) -> MogulResult<u64>;

    /// Returns the distinct values of `field` among the matching documents.
    fn distinct(
        &self,
        ctx: &Context,
        ns: &Namespace,
        field: &str,
        filter: Document,
        options: DistinctOptions,
    ) -> MogulResult<Vec<Bson>>;

    fn aggregate(
        &self,
        ctx: &Context,
        ns: &Namespace,
        pipeline: Vec<Document>,
        options: AggregateOptions,
    ) -> MogulResult<DocumentCursor>;

    /// Creates the indexes and returns their names.
    fn create_indexes(
        &self,
        ctx: &Context,
        ns: &Namespace,
        models: Vec<IndexModel>,
        options: CreateIndexOptions,
    ) -> MogulResult<Vec<String>>;

    fn drop_index(&self, ctx: &Context, ns: &Namespace, name: &str) -> MogulResult<()>;

    /// Drops every index of the collection except the one on `_id`.
    fn drop_indexes(&self, ctx: &Context, ns: &Namespace) -> MogulResult<()>;
}
