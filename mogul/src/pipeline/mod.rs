//! Aggregation pipelines.
//!
//! A [`Pipeline`] collects stages, either raw documents or `$match` stages
//! built from a [`Condition`], and runs them through the aggregation entry
//! point of the store.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mogul::{Condition, Predicates};
//! use bson::doc;
//!
//! let totals: Vec<Total> = client
//!     .pipeline()
//!     .match_stage(Condition::new().eq("status", "paid"))
//!     .add_stages(vec![doc! { "$sort": { "amount": -1 } }, doc! { "$limit": 10 }])
//!     .all::<Order, Total>()?;
//! ```

use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use bson::{doc, Document};
use serde::de::DeserializeOwned;

use crate::client_config::ClientConfig;
use crate::common::{Context, STAGE_MATCH};
use crate::errors::{ErrorKind, MogulError, MogulResult};
use crate::filter::Condition;
use crate::model::Model;
use crate::options::{AggregateOptions, Collation, Hint};
use crate::resolver::NameResolver;
use crate::store::{DocumentStore, ModelCursor, Namespace};

/// A chain of aggregation stages bound to one collection.
#[derive(Clone)]
pub struct Pipeline {
    store: Arc<dyn DocumentStore>,
    resolver: NameResolver,
    config: ClientConfig,
    stages: Vec<Document>,
    error: Option<MogulError>,
    database: Option<String>,
    collection: Option<String>,
    context: Option<Context>,
    options: AggregateOptions,
}

impl Pipeline {
    pub(crate) fn new(
        store: Arc<dyn DocumentStore>,
        resolver: NameResolver,
        config: ClientConfig,
    ) -> Self {
        Pipeline {
            store,
            resolver,
            config,
            stages: Vec::new(),
            error: None,
            database: None,
            collection: None,
            context: None,
            options: AggregateOptions::default(),
        }
    }

    /// Appends raw stages verbatim.
    pub fn add_stages<I>(mut self, stages: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        self.stages.extend(stages);
        self
    }

    /// Appends a `$match` stage holding the expression of `condition`.
    ///
    /// An error latched in the condition is reported by the terminal call.
    pub fn match_stage(mut self, condition: Condition) -> Self {
        match condition.filters() {
            Ok(expression) => {
                self.stages
                    .push(doc! { STAGE_MATCH: expression.to_document() });
            }
            Err(err) => self.latch(err),
        }
        self
    }

    pub fn database(mut self, name: &str) -> Self {
        self.database = Some(name.to_string());
        self
    }

    /// Targets the collection of `doc`, resolved now.
    pub fn collection<T: Model>(mut self, doc: &T) -> Self {
        match self.resolver.resolve(doc) {
            Ok(descriptor) => self.collection = Some(descriptor.name().to_string()),
            Err(err) => self.latch(err),
        }
        self
    }

    pub fn collection_name(mut self, name: &str) -> Self {
        self.collection = Some(name.to_string());
        self
    }

    pub fn with_context(mut self, ctx: Context) -> Self {
        self.context = Some(ctx);
        self
    }

    pub fn set_allow_disk_use(mut self, allow_disk_use: bool) -> Self {
        self.options.allow_disk_use = Some(allow_disk_use);
        self
    }

    pub fn set_batch_size(mut self, batch_size: u32) -> Self {
        self.options.batch_size = Some(batch_size);
        self
    }

    pub fn set_max_time(mut self, max_time: Duration) -> Self {
        self.options.max_time = Some(max_time);
        self
    }

    pub fn set_collation(mut self, collation: Collation) -> Self {
        self.options.collation = Some(collation);
        self
    }

    pub fn set_hint(mut self, hint: Hint) -> Self {
        self.options.hint = Some(hint);
        self
    }

    pub fn options(&self) -> &AggregateOptions {
        &self.options
    }

    /// The stages collected so far, or the first latched error.
    pub fn build(&self) -> MogulResult<Vec<Document>> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(self.stages.clone()),
        }
    }

    /// Runs the pipeline on the collection of `T` and decodes the first
    /// result into `R`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NoDocuments`] when the pipeline yields nothing.
    pub fn one<T: Model, R: DeserializeOwned>(self) -> MogulResult<R> {
        match self.cursor::<T, R>()?.next() {
            Some(result) => result,
            None => Err(MogulError::new(
                "aggregate produced no documents",
                ErrorKind::NoDocuments,
            )),
        }
    }

    /// Runs the pipeline on the collection of `T` and decodes every result
    /// into `R`.
    pub fn all<T: Model, R: DeserializeOwned>(self) -> MogulResult<Vec<R>> {
        self.cursor::<T, R>()?.collect()
    }

    fn cursor<T: Model, R: DeserializeOwned>(self) -> MogulResult<ModelCursor<R>> {
        let stages = self.build()?;
        let ns = self.namespace::<T>()?;
        let ctx = match &self.context {
            Some(ctx) => ctx.clone(),
            None => self.config.new_context(),
        };
        log::debug!("aggregate on {} with {} stages", ns, stages.len());

        let cursor = self.store.aggregate(&ctx, &ns, stages, self.options)?;
        Ok(cursor.into_models())
    }

    fn namespace<T: Model>(&self) -> MogulResult<Namespace> {
        let collection = match &self.collection {
            Some(name) => name.clone(),
            None => self.resolver.resolve_type::<T>()?.name().to_string(),
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

    fn latch(&mut self, err: MogulError) {
        log::error!("Pipeline stage failed: {}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

impl Debug for Pipeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}
