use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use bson::Document;
use serde::de::DeserializeOwned;

use crate::errors::MogulResult;

/// Iterator over the documents produced by a store query.
pub struct DocumentCursor {
    inner: Box<dyn Iterator<Item = MogulResult<Document>> + Send>,
}

impl DocumentCursor {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = MogulResult<Document>> + Send + 'static,
    {
        DocumentCursor {
            inner: Box::new(iter),
        }
    }

    /// A cursor over documents already in memory.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        DocumentCursor::new(documents.into_iter().map(Ok))
    }

    pub fn empty() -> Self {
        DocumentCursor::from_documents(Vec::new())
    }

    /// Drains the cursor, stopping at the first error.
    pub fn collect_documents(self) -> MogulResult<Vec<Document>> {
        self.collect()
    }

    /// Decodes every document of the cursor into `T`.
    pub fn into_models<T: DeserializeOwned>(self) -> ModelCursor<T> {
        ModelCursor::new(self)
    }
}

impl Iterator for DocumentCursor {
    type Item = MogulResult<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl Debug for DocumentCursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentCursor")
    }
}

/// A [`DocumentCursor`] decoding each document into a model.
pub struct ModelCursor<T> {
    cursor: DocumentCursor,
    _phantom: PhantomData<T>,
}

impl<T: DeserializeOwned> ModelCursor<T> {
    pub fn new(cursor: DocumentCursor) -> Self {
        ModelCursor {
            cursor,
            _phantom: PhantomData,
        }
    }

    /// Decodes the next document, if any.
    pub fn first(&mut self) -> Option<MogulResult<T>> {
        self.next()
    }
}

impl<T: DeserializeOwned> Iterator for ModelCursor<T> {
    type Item = MogulResult<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.cursor.next()? {
            Ok(doc) => Some(bson::from_document(doc).map_err(Into::into)),
            Err(e) => Some(Err(e)),
        }
    }
}
