use bson::{Bson, Document};

use super::Predicates;
use crate::errors::{MogulError, MogulResult};

/// An ordered filter expression under construction.
///
/// Cloning yields an independent builder: entries appended to the clone
/// never show up in the original.
#[derive(Debug, Clone, Default)]
pub struct Condition {
    entries: Vec<(String, Bson)>,
    error: Option<MogulError>,
}

impl Condition {
    pub fn new() -> Self {
        Condition::default()
    }

    /// Materializes the expression.
    ///
    /// # Returns
    ///
    /// The entries in call order, or the first error latched while the
    /// condition was being built.
    pub fn filters(&self) -> MogulResult<Expression> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(Expression {
                entries: self.entries.clone(),
            }),
        }
    }

    /// Appends an entry verbatim.
    pub fn push(&mut self, key: &str, value: Bson) {
        self.entries.push((key.to_string(), value));
    }

    /// Records a construction error; only the first one is kept.
    pub fn latch(&mut self, err: MogulError) {
        log::error!("Filter construction failed: {}", err);
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// The latched error, if any.
    pub fn error(&self) -> Option<&MogulError> {
        self.error.as_ref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Predicates for Condition {
    fn condition_mut(&mut self) -> &mut Condition {
        self
    }
}

/// A materialized filter expression.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    entries: Vec<(String, Bson)>,
}

impl Expression {
    pub fn entries(&self) -> &[(String, Bson)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(String, Bson)> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The expression as a filter document.
    ///
    /// A key used more than once keeps the position of its first entry and
    /// the value of its last, which is what a document store would see.
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        for (key, value) in &self.entries {
            doc.insert(key.clone(), value.clone());
        }
        doc
    }

    /// The expression as an ordered array of single-entry documents, the
    /// operand form of `$and`, `$or`, `$nor` and `$expr`.
    pub fn to_array(&self) -> Vec<Bson> {
        self.entries
            .iter()
            .map(|(key, value)| {
                let mut doc = Document::new();
                doc.insert(key.clone(), value.clone());
                Bson::Document(doc)
            })
            .collect()
    }
}

impl From<Expression> for Document {
    fn from(expression: Expression) -> Self {
        expression.to_document()
    }
}
