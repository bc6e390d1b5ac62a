//! Sessions: one chain of predicates and options ending in one operation.
//!
//! A session is obtained from [`Client::session`](crate::Client::session),
//! configured by chaining [`Predicates`] and option setters, and consumed by
//! a terminal operation. [`Clone`] forks a chain into two independent ones.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mogul::{Predicates, SortOrder};
//!
//! let adults: Vec<Person> = client
//!     .session()
//!     .gte("age", 18)
//!     .soft(false)
//!     .sort(&["last_name", "-age"])
//!     .limit(20)
//!     .find_all()?;
//! ```

mod options;
mod terminal;

use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use bson::Document;

use crate::client_config::ClientConfig;
use crate::common::Context;
use crate::errors::{MogulError, MogulResult};
use crate::filter::{Condition, Expression, Predicates};
use crate::model::Model;
use crate::options::*;
use crate::resolver::NameResolver;
use crate::store::{DocumentStore, Namespace};

/// A chainable query context.
///
/// Holds the filter under construction, the target overrides, the
/// operation context and one option struct per operation kind.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn DocumentStore>,
    resolver: NameResolver,
    config: ClientConfig,
    soft_delete_field: String,
    condition: Condition,
    database: Option<String>,
    collection: Option<String>,
    context: Option<Context>,
    error: Option<MogulError>,
    find_options: FindOptions,
    count_options: CountOptions,
    distinct_options: DistinctOptions,
    update_options: UpdateOptions,
    delete_options: DeleteOptions,
    insert_one_options: InsertOneOptions,
    insert_many_options: InsertManyOptions,
    bulk_write_options: BulkWriteOptions,
    find_one_and_update_options: FindOneAndUpdateOptions,
    find_one_and_replace_options: FindOneAndReplaceOptions,
    find_one_and_delete_options: FindOneAndDeleteOptions,
}

impl Session {
    pub(crate) fn new(
        store: Arc<dyn DocumentStore>,
        resolver: NameResolver,
        config: ClientConfig,
    ) -> Self {
        let soft_delete_field = config.soft_delete_field();
        Session {
            store,
            resolver,
            config,
            soft_delete_field,
            condition: Condition::new(),
            database: None,
            collection: None,
            context: None,
            error: None,
            find_options: FindOptions::default(),
            count_options: CountOptions::default(),
            distinct_options: DistinctOptions::default(),
            update_options: UpdateOptions::default(),
            delete_options: DeleteOptions::default(),
            insert_one_options: InsertOneOptions::default(),
            insert_many_options: InsertManyOptions::default(),
            bulk_write_options: BulkWriteOptions::default(),
            find_one_and_update_options: FindOneAndUpdateOptions::default(),
            find_one_and_replace_options: FindOneAndReplaceOptions::default(),
            find_one_and_delete_options: FindOneAndDeleteOptions::default(),
        }
    }

    /// Targets another database than the configured one.
    pub fn database(mut self, name: &str) -> Self {
        self.database = Some(name.to_string());
        self
    }

    /// Targets the collection of `doc`, resolved now.
    ///
    /// A resolution failure is reported by the terminal operation.
    pub fn collection<T: Model>(mut self, doc: &T) -> Self {
        match self.resolver.resolve(doc) {
            Ok(descriptor) => self.collection = Some(descriptor.name().to_string()),
            Err(err) => {
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
        self
    }

    /// Targets a collection by name, bypassing resolution.
    pub fn collection_name(mut self, name: &str) -> Self {
        self.collection = Some(name.to_string());
        self
    }

    /// Runs the terminal operation under `ctx` instead of a fresh context.
    pub fn with_context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    /// The filter accumulated so far, or the first latched error.
    pub fn filters(&self) -> MogulResult<Expression> {
        self.condition.filters()
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    pub(crate) fn filter_document(&self) -> MogulResult<Document> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        Ok(self.condition.filters()?.to_document())
    }

    pub(crate) fn context(&self) -> Context {
        match &self.context {
            Some(ctx) => ctx.clone(),
            None => self.config.new_context(),
        }
    }

    /// Namespace of the operation: the explicit target if one was set, the
    /// collection of `value` if given, the collection of `T` otherwise.
    pub(crate) fn namespace<T: Model>(&self, value: Option<&T>) -> MogulResult<Namespace> {
        let collection = match (&self.collection, value) {
            (Some(name), _) => name.clone(),
            (None, Some(value)) => self.resolver.resolve(value)?.name().to_string(),
            (None, None) => self.resolver.resolve_type::<T>()?.name().to_string(),
        };
        let database = match &self.database {
            Some(name) => name.clone(),
            None => self.config.database(),
        };
        Ok(Namespace {
            database,
            collection,
        })
    }
}

impl Predicates for Session {
    fn condition_mut(&mut self) -> &mut Condition {
        &mut self.condition
    }

    fn soft_delete_field(&self) -> &str {
        &self.soft_delete_field
    }
}

impl Debug for Session {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("condition", &self.condition)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}
