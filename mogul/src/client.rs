use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::client_builder::ClientBuilder;
use crate::client_config::ClientConfig;
use crate::errors::MogulResult;
use crate::filter::{IdInput, Predicates};
use crate::model::Model;
use crate::options::{CreateIndexOptions, IndexModel};
use crate::pipeline::Pipeline;
use crate::resolver::NameResolver;
use crate::session::Session;
use crate::store::{
    DeleteResult, DocumentStore, InsertManyResult, InsertOneResult, Namespace, UpdateResult,
};

/// Entry point of mogul.
///
/// A `Client` owns the document store, the configuration and the
/// collection name cache. Every query starts from [`session`](Client::session)
/// or [`pipeline`](Client::pipeline); the convenience methods open a fresh
/// session per call.
///
/// `Client` uses the PIMPL design pattern: clones are cheap and share the
/// store, the configuration and the name cache. It is `Send + Sync`.
///
/// # Examples
///
/// ```rust,ignore
/// use mogul::{Client, Predicates};
/// use mogul::store::MemoryStore;
///
/// let client = Client::builder().database("shop").build(MemoryStore::new())?;
/// client.insert_one(&order)?;
///
/// let open: Vec<Order> = client.session().eq("status", "open").find_all()?;
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

impl Client {
    /// Creates a new `ClientBuilder`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client over `store`. The configuration is frozen from now
    /// on.
    pub fn new(store: Arc<dyn DocumentStore>, config: ClientConfig) -> Self {
        config.mark_configured();
        let resolver = NameResolver::new(config.naming());
        log::debug!("Client created for database {}", config.database());
        Client {
            inner: Arc::new(ClientInner {
                store,
                resolver,
                config,
            }),
        }
    }

    /// Opens a new session.
    pub fn session(&self) -> Session {
        Session::new(
            self.inner.store.clone(),
            self.inner.resolver.clone(),
            self.inner.config.clone(),
        )
    }

    /// Opens a new aggregation pipeline.
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            self.inner.store.clone(),
            self.inner.resolver.clone(),
            self.inner.config.clone(),
        )
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.inner.resolver
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn store(&self) -> Arc<dyn DocumentStore> {
        self.inner.store.clone()
    }

    /// The collection name of `T`.
    pub fn collection_name<T: Model>(&self) -> MogulResult<String> {
        Ok(self.inner.resolver.resolve_type::<T>()?.name().to_string())
    }

    /// Returns the first document of `T`'s collection equal to `filter` on
    /// its non-zero filter fields.
    pub fn find_one<T: Model>(&self, filter: &T) -> MogulResult<T> {
        self.session().filter_by(filter).find_one()
    }

    /// Returns every document matching the non-zero filter fields of
    /// `filter`.
    pub fn find_all<T: Model>(&self, filter: &T) -> MogulResult<Vec<T>> {
        self.session().filter_by(filter).find_all()
    }

    pub fn find_by_id<T: Model, I: Into<IdInput>>(&self, id: I) -> MogulResult<T> {
        self.session().id(id).find_one()
    }

    pub fn count<T: Model>(&self, filter: &T) -> MogulResult<u64> {
        self.session().filter_by(filter).count::<T>()
    }

    pub fn insert_one<T: Model>(&self, doc: &T) -> MogulResult<InsertOneResult> {
        self.session().insert_one(doc)
    }

    pub fn insert_many<T: Model>(&self, docs: &[T]) -> MogulResult<InsertManyResult> {
        self.session().insert_many(docs)
    }

    /// Sets the fields of `doc` on the first document matching `filter`.
    pub fn update_one<T: Model>(&self, filter: &T, doc: &T) -> MogulResult<UpdateResult> {
        self.session().filter_by(filter).update_one(doc)
    }

    pub fn delete_one<T: Model>(&self, filter: &T) -> MogulResult<DeleteResult> {
        self.session().filter_by(filter).delete_one::<T>()
    }

    pub fn delete_many<T: Model>(&self, filter: &T) -> MogulResult<DeleteResult> {
        self.session().filter_by(filter).delete_many::<T>()
    }

    /// Creates the indexes declared on `T` with `#[model(index(...))]`.
    ///
    /// # Returns
    ///
    /// The names of the indexes, empty when `T` declares none.
    pub fn ensure_indexes<T: Model>(&self) -> MogulResult<Vec<String>> {
        let models = T::indexes();
        if models.is_empty() {
            return Ok(Vec::new());
        }
        self.create_indexes::<T>(models)
    }

    pub fn create_indexes<T: Model>(&self, models: Vec<IndexModel>) -> MogulResult<Vec<String>> {
        let ns = self.namespace::<T>()?;
        log::debug!("Creating {} indexes on {}", models.len(), ns);
        self.inner.store.create_indexes(
            &self.inner.config.new_context(),
            &ns,
            models,
            CreateIndexOptions::default(),
        )
    }

    pub fn drop_index<T: Model>(&self, name: &str) -> MogulResult<()> {
        let ns = self.namespace::<T>()?;
        log::debug!("Dropping index {} on {}", name, ns);
        self.inner
            .store
            .drop_index(&self.inner.config.new_context(), &ns, name)
    }

    /// Drops every index of `T`'s collection except the `_id` index.
    pub fn drop_indexes<T: Model>(&self) -> MogulResult<()> {
        let ns = self.namespace::<T>()?;
        log::debug!("Dropping all indexes on {}", ns);
        self.inner
            .store
            .drop_indexes(&self.inner.config.new_context(), &ns)
    }

    fn namespace<T: Model>(&self) -> MogulResult<Namespace> {
        let collection = self.inner.resolver.resolve_type::<T>()?;
        Ok(Namespace::new(
            &self.inner.config.database(),
            collection.name(),
        ))
    }
}

impl Debug for Client {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.inner.config)
            .field("resolver", &self.inner.resolver)
            .finish()
    }
}

struct ClientInner {
    store: Arc<dyn DocumentStore>,
    resolver: NameResolver,
    config: ClientConfig,
}
