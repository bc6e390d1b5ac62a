use std::time::Duration;

use bson::Document;
use itertools::Itertools;

use crate::common::SortOrder;

/// An index definition: the key specification and its options.
///
/// # Examples
///
/// ```rust,ignore
/// use mogul::options::IndexModel;
///
/// // {email: 1} unique
/// let by_email = IndexModel::from_fields(&["email"], true);
/// // {last_name: 1, age: -1}
/// let compound = IndexModel::from_fields(&["last_name", "-age"], false);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexModel {
    pub keys: Document,
    pub options: IndexOptions,
}

impl IndexModel {
    pub fn new(keys: Document, options: IndexOptions) -> Self {
        IndexModel { keys, options }
    }

    /// Builds an index over the named fields, `-` marking descending keys.
    ///
    /// # Arguments
    ///
    /// * `fields` - Field names in key order, optionally prefixed with `-`
    /// * `unique` - Whether the index rejects duplicate keys
    pub fn from_fields(fields: &[&str], unique: bool) -> Self {
        let mut keys = Document::new();
        for field in fields {
            let (name, order) = SortOrder::parse_field(field.trim());
            keys.insert(name, order.as_i32());
        }
        IndexModel {
            keys,
            options: IndexOptions {
                unique: unique.then_some(true),
                ..Default::default()
            },
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.options.name = Some(name.to_string());
        self
    }

    pub fn is_unique(&self) -> bool {
        self.options.unique.unwrap_or(false)
    }

    /// The explicit name, or the conventional `field_1_other_-1` form.
    pub fn index_name(&self) -> String {
        if let Some(name) = &self.options.name {
            return name.clone();
        }
        self.keys
            .iter()
            .map(|(key, value)| format!("{}_{}", key, value))
            .join("_")
    }
}

/// Options of a single index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexOptions {
    pub name: Option<String>,
    pub unique: Option<bool>,
    pub sparse: Option<bool>,
    pub expire_after: Option<Duration>,
}

/// Options for `create_indexes`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateIndexOptions {
    pub max_time: Option<Duration>,
}
