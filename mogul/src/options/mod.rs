//! Per-operation option structs handed to a [`DocumentStore`](crate::store::DocumentStore).
//!
//! The shapes follow the usual document-driver options: every field is
//! optional and `None` means "use the store default". A session keeps one
//! struct per operation kind and its setters write every struct that
//! accepts the option.

mod index;
mod read;
mod write;

pub use index::*;
pub use read::*;
pub use write::*;

use bson::Document;

/// Language-aware string comparison rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collation {
    pub locale: String,
    /// Comparison level, 1 (base characters) to 5 (identical)
    pub strength: Option<u32>,
    pub case_level: Option<bool>,
    pub numeric_ordering: Option<bool>,
}

impl Collation {
    pub fn new(locale: &str) -> Self {
        Collation {
            locale: locale.to_string(),
            ..Default::default()
        }
    }

    pub fn strength(mut self, strength: u32) -> Self {
        self.strength = Some(strength);
        self
    }

    pub fn case_level(mut self, case_level: bool) -> Self {
        self.case_level = Some(case_level);
        self
    }

    pub fn numeric_ordering(mut self, numeric_ordering: bool) -> Self {
        self.numeric_ordering = Some(numeric_ordering);
        self
    }
}

/// Index the store should use for a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Hint {
    /// Index identified by its key specification
    Keys(Document),
    /// Index identified by its name
    Name(String),
}

/// Which version of a document a find-and-modify operation returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReturnDocument {
    /// The document as it was before the modification
    #[default]
    Before,
    /// The document as it is after the modification
    After,
}
