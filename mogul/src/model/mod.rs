//! Models and their static field-descriptor tables.
//!
//! A model is a plain struct deriving [`Model`](crate::Model). The derive
//! macro generates a descriptor table ([`Fields::fields`]) listing every
//! stored field with its storage name, its optional filter tag, its
//! omit-if-empty flag and a reference to the value. Struct filters and
//! update documents are computed from that table without any runtime
//! reflection.
//!
//! Storage names follow serde: `#[field(name = "...")]`, else the field's
//! `#[serde(rename = "...")]`, else the container's
//! `#[serde(rename_all = "...")]` applied to the identifier. A field whose
//! type does not implement [`FieldValue`], such as a user enum, is marked
//! `#[field(serde)]` and encoded through its `Serialize` impl instead.
//!
//! # Examples
//!
//! ```rust,ignore
//! use mogul::{Embedded, Model};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize, Embedded)]
//! pub struct Location {
//!     pub city: String,
//!     pub zip: String,
//! }
//!
//! #[derive(Debug, Default, Serialize, Deserialize, Model)]
//! #[model(collection = "people", index(fields = "email", unique))]
//! pub struct Person {
//!     #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
//!     #[field(omitempty)]
//!     pub id: Option<ObjectId>,
//!     #[field(filter = "name")]
//!     pub name: String,
//!     #[field(filter = "email")]
//!     pub email: String,
//!     #[field(filter = "location")]
//!     pub location: Location,
//! }
//! ```

mod extract;
mod field_value;

pub use extract::*;

use bson::Bson;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::common::TAG_SEPARATOR;
use crate::common::TAG_SKIP;
use crate::errors::MogulResult;
use crate::filter::FilterSource;
use crate::options::IndexModel;

/// The shape of a field value, as far as struct filters care.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Compared by equality as a whole
    Scalar,
    /// Sequence values, never turned into filter predicates
    Array,
    /// Nested struct, flattened into dotted paths
    Struct,
}

/// A value that can be stored in a model field.
///
/// Implemented for the primitive types, bson types, `Option`, `Box`, `Vec`
/// and string-keyed maps; the derive macros implement it for structs.
pub trait FieldValue {
    /// The stored form of the value.
    ///
    /// Fails with `EncodingError` when the value has no bson form, such as
    /// an unsigned integer above `i64::MAX`.
    fn to_bson(&self) -> MogulResult<Bson>;

    /// Whether the value is the zero value of its type: numeric zero, empty
    /// string, `None`, empty collection, nil object id, epoch datetime, or a
    /// struct whose fields are all zero.
    fn is_zero(&self) -> bool;

    fn kind(&self) -> FieldKind {
        FieldKind::Scalar
    }

    /// Descriptor table of a nested struct value.
    fn nested_fields(&self) -> Option<Vec<ModelField<'_>>> {
        None
    }
}

enum FieldSlot<'a> {
    Borrowed(&'a dyn FieldValue),
    Encoded(SerdeValue),
}

/// A field value already encoded through serde.
///
/// Zero when it encodes to a zero bson value (see `FieldValue for Bson`).
/// An encoding failure is kept and returned by `to_bson`.
pub struct SerdeValue(MogulResult<Bson>);

impl SerdeValue {
    pub fn encode<T: Serialize + ?Sized>(value: &T) -> Self {
        SerdeValue(bson::to_bson(value).map_err(Into::into))
    }
}

impl FieldValue for SerdeValue {
    fn to_bson(&self) -> MogulResult<Bson> {
        self.0.clone()
    }

    fn is_zero(&self) -> bool {
        match &self.0 {
            Ok(value) => value.is_zero(),
            Err(_) => false,
        }
    }

    fn kind(&self) -> FieldKind {
        match &self.0 {
            Ok(value) => value.kind(),
            Err(_) => FieldKind::Scalar,
        }
    }
}

/// One row of a model's field-descriptor table.
pub struct ModelField<'a> {
    name: &'static str,
    filter_tag: Option<&'static str>,
    omit_empty: bool,
    value: FieldSlot<'a>,
}

impl<'a> ModelField<'a> {
    pub fn new(
        name: &'static str,
        filter_tag: Option<&'static str>,
        omit_empty: bool,
        value: &'a dyn FieldValue,
    ) -> Self {
        ModelField {
            name,
            filter_tag,
            omit_empty,
            value: FieldSlot::Borrowed(value),
        }
    }

    /// A row whose value is encoded with serde, for `#[field(serde)]`.
    pub fn serialized<T: Serialize + ?Sized>(
        name: &'static str,
        filter_tag: Option<&'static str>,
        omit_empty: bool,
        value: &T,
    ) -> Self {
        ModelField {
            name,
            filter_tag,
            omit_empty,
            value: FieldSlot::Encoded(SerdeValue::encode(value)),
        }
    }

    /// Storage name of the field.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Raw filter tag as written on the field.
    pub fn filter_tag(&self) -> Option<&'static str> {
        self.filter_tag
    }

    /// The filter key: first comma-delimited segment of the filter tag.
    ///
    /// `None` when the field has no tag, an empty tag, or the `-` tag.
    pub fn filter_key(&self) -> Option<&'static str> {
        let tag = self.filter_tag?;
        let key = tag.split(TAG_SEPARATOR).next().unwrap_or_default().trim();
        if key.is_empty() || key == TAG_SKIP {
            None
        } else {
            Some(key)
        }
    }

    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    pub fn value(&self) -> &dyn FieldValue {
        match &self.value {
            FieldSlot::Borrowed(value) => *value,
            FieldSlot::Encoded(value) => value,
        }
    }
}

/// Access to the field-descriptor table of a struct.
pub trait Fields {
    fn fields(&self) -> Vec<ModelField<'_>>;
}

/// A struct stored as documents of one collection.
///
/// Usually derived with `#[derive(Model)]`, which also implements the
/// supertraits other than the serde ones.
pub trait Model:
    Fields
    + FieldValue
    + FilterSource
    + Serialize
    + DeserializeOwned
    + Default
    + Send
    + Sync
    + 'static
{
    /// Bare identifier of the type, the input of the naming convention.
    fn type_name() -> &'static str;

    /// Collection name override.
    ///
    /// Returning `Some` takes precedence over the naming convention. The
    /// derive wires this to `#[model(collection = "...")]` or, with
    /// `#[model(custom_name)]`, to the type's [`CollectionName`] impl.
    fn custom_collection_name(&self) -> Option<String> {
        None
    }

    /// Indexes declared with `#[model(index(...))]`.
    fn indexes() -> Vec<IndexModel> {
        Vec::new()
    }
}

/// Computes the collection name of a model value.
///
/// Implement it and mark the model with `#[model(custom_name)]` when the
/// name depends on the value, for example to shard by tenant.
pub trait CollectionName {
    fn collection_name(&self) -> String;
}
