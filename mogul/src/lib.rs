//! # Mogul - Fluent Object-Document Mapping
//!
//! Mogul is a query-building layer over document store clients. It turns
//! chained predicate calls, plain structs and type names into the filter
//! documents, update documents and collection names a document database
//! expects, and hands them to a [`DocumentStore`](store::DocumentStore).
//!
//! ## Key Features
//!
//! - **Chained filters**: `eq`, `gt`, `in_array`, `regex`, `and`, `or` and
//!   friends build an ordered filter expression, reporting the first
//!   construction error once at the end
//! - **Struct filters**: any model or embedded struct can act as a filter;
//!   zero fields are skipped and nested structs become dotted paths
//! - **Collection naming**: collection names come from the type name through
//!   a naming convention, with per-type and per-value overrides
//! - **Sessions**: one chain of predicates and options ending in a find,
//!   update, delete, count, distinct or bulk write
//! - **Pipelines**: aggregation stages built from raw documents or conditions
//! - **Pluggable stores**: an in-memory store ships with the crate
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use mogul::{Client, Model, Predicates};
//! use mogul::store::MemoryStore;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize, Model)]
//! struct UserAccount {
//!     #[field(filter = "email")]
//!     email: String,
//!     #[field(filter = "age", omitempty)]
//!     age: i32,
//! }
//!
//! let client = Client::builder().database("app").build(MemoryStore::new())?;
//! client.insert_one(&UserAccount { email: "a@b.c".into(), age: 30 })?;
//!
//! // stored in the "user_account" collection
//! let adults: Vec<UserAccount> = client.session().gte("age", 18).find_all()?;
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - The client, entry point of every operation
//! - [`client_builder`] - Client builder
//! - [`client_config`] - Client configuration
//! - [`common`] - Constants, contexts, naming conventions and sort orders
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Condition builder, predicates and filter sources
//! - [`model`] - Model traits and field-descriptor tables
//! - [`options`] - Operation options
//! - [`pipeline`] - Aggregation pipelines
//! - [`resolver`] - Collection name resolution
//! - [`session`] - Sessions and their terminal operations
//! - [`store`] - Document store abstraction and the in-memory store

extern crate self as mogul;

pub mod client;
pub mod client_builder;
pub mod client_config;
pub mod common;
pub mod errors;
pub mod filter;
pub mod model;
pub mod options;
pub mod pipeline;
pub mod resolver;
pub mod session;
pub mod store;

pub use bson;

#[cfg(feature = "derive")]
pub use mogul_derive::{Embedded, Model};

pub use client::Client;
pub use client_builder::ClientBuilder;
pub use client_config::ClientConfig;
pub use common::{Context, NamingConvention, SortOrder};
pub use errors::{ErrorKind, MogulError, MogulResult};
pub use filter::{Condition, Expression, FilterSource, IdInput, Predicates};
pub use model::{CollectionName, FieldValue, Fields, Model, ModelField};
pub use pipeline::Pipeline;
pub use resolver::{CollectionDescriptor, NameResolver};
pub use session::Session;
