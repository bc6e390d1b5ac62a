use std::sync::Arc;
use std::time::Duration;

use crate::client::Client;
use crate::client_config::ClientConfig;
use crate::common::NamingConvention;
use crate::errors::{MogulError, MogulResult};
use crate::store::DocumentStore;

/// Fluent builder for a [`Client`].
///
/// Setters never fail; the first invalid setting is remembered and
/// returned by [`build`](ClientBuilder::build).
///
/// # Examples
///
/// ```rust,ignore
/// use mogul::{Client, NamingConvention};
/// use mogul::store::MemoryStore;
///
/// let client = Client::builder()
///     .database("shop")
///     .naming(NamingConvention::lower_case())
///     .soft_delete_field("removed_at")
///     .build(MemoryStore::new())?;
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    error: Option<MogulError>,
    config: ClientConfig,
}

impl ClientBuilder {
    pub fn new() -> Self {
        ClientBuilder {
            error: None,
            config: ClientConfig::new(),
        }
    }

    pub fn database(mut self, database: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_database(database) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn naming(mut self, naming: NamingConvention) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_naming(naming) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn soft_delete_field(mut self, field: &str) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_soft_delete_field(field) {
                self.error = Some(e);
            }
        }
        self
    }

    pub fn default_timeout(mut self, timeout: Duration) -> Self {
        if self.error.is_none() {
            if let Err(e) = self.config.set_default_timeout(Some(timeout)) {
                self.error = Some(e);
            }
        }
        self
    }

    /// Builds a client over `store`.
    ///
    /// # Returns
    ///
    /// The first error recorded by a setter, or the client.
    pub fn build<S: DocumentStore + 'static>(self, store: S) -> MogulResult<Client> {
        self.build_shared(Arc::new(store))
    }

    /// Builds a client over an already shared store.
    pub fn build_shared(self, store: Arc<dyn DocumentStore>) -> MogulResult<Client> {
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(Client::new(store, self.config))
    }
}
