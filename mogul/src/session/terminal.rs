use bson::{doc, Bson, DateTime, Document};

use super::Session;
use crate::common::{OP_SET, STAGE_MATCH};
use crate::errors::{ErrorKind, MogulError, MogulResult};
use crate::model::{set_document, to_document, Model};
use crate::store::{
    BulkWriteResult, DeleteResult, InsertManyResult, InsertOneResult, ModelCursor, UpdateResult,
    WriteModel,
};

fn no_documents(operation: &str) -> MogulError {
    MogulError::new(
        &format!("{} matched no documents", operation),
        ErrorKind::NoDocuments,
    )
}

fn decode<T: Model>(doc: Document) -> MogulResult<T> {
    Ok(bson::from_document(doc)?)
}

impl Session {
    fn check_target(&self) -> MogulResult<()> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Returns the first matching document.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::NoDocuments`] when nothing matches.
    pub fn find_one<T: Model>(self) -> MogulResult<T> {
        let ns = self.namespace::<T>(None)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        log::debug!("find_one on {} with filter {}", ns, filter);

        match self
            .store
            .find_one(&ctx, &ns, filter, self.find_options.clone())?
        {
            Some(doc) => decode(doc),
            None => Err(no_documents("find_one")),
        }
    }

    /// Returns every matching document, honouring sort, skip and limit.
    pub fn find_all<T: Model>(self) -> MogulResult<Vec<T>> {
        self.find_cursor::<T>()?.collect()
    }

    /// Returns a cursor decoding the matching documents lazily.
    pub fn find_cursor<T: Model>(self) -> MogulResult<ModelCursor<T>> {
        let ns = self.namespace::<T>(None)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        log::debug!("find on {} with filter {}", ns, filter);

        let cursor = self
            .store
            .find(&ctx, &ns, filter, self.find_options.clone())?;
        Ok(cursor.into_models())
    }

    pub fn count<T: Model>(self) -> MogulResult<u64> {
        let ns = self.namespace::<T>(None)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        log::debug!("count on {} with filter {}", ns, filter);

        self.store
            .count_documents(&ctx, &ns, filter, self.count_options.clone())
    }

    /// Distinct values of `field` among the matching documents.
    pub fn distinct<T: Model>(self, field: &str) -> MogulResult<Vec<Bson>> {
        let ns = self.namespace::<T>(None)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        log::debug!("distinct {} on {} with filter {}", field, ns, filter);

        self.store
            .distinct(&ctx, &ns, field, filter, self.distinct_options.clone())
    }

    pub fn insert_one<T: Model>(self, doc: &T) -> MogulResult<InsertOneResult> {
        self.check_target()?;
        let ns = self.namespace(Some(doc))?;
        let document = to_document(doc)?;
        let ctx = self.context();
        log::debug!("insert_one on {}", ns);

        self.store
            .insert_one(&ctx, &ns, document, self.insert_one_options.clone())
    }

    /// Inserts every document into the collection of the first one.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidOperation`] for an empty slice.
    pub fn insert_many<T: Model>(self, docs: &[T]) -> MogulResult<InsertManyResult> {
        self.check_target()?;
        let Some(first) = docs.first() else {
            log::error!("insert_many called without documents");
            return Err(MogulError::new(
                "insert_many needs at least one document",
                ErrorKind::InvalidOperation,
            ));
        };
        let ns = self.namespace(Some(first))?;
        let documents = docs
            .iter()
            .map(to_document)
            .collect::<MogulResult<Vec<_>>>()?;
        let ctx = self.context();
        log::debug!("insert_many of {} documents on {}", documents.len(), ns);

        self.store
            .insert_many(&ctx, &ns, documents, self.insert_many_options.clone())
    }

    /// Sets the fields of `doc` on the first matching document.
    ///
    /// Every stored field goes into `$set` except zero-valued `omitempty`
    /// fields. A struct whose fields are all zero issues no update.
    pub fn update_one<T: Model>(self, doc: &T) -> MogulResult<UpdateResult> {
        match set_document(&doc.fields())? {
            Some(values) => self.update_by(Some(doc), doc! { OP_SET: values }, false),
            None => {
                log::warn!("update_one skipped, every field of {} is zero", T::type_name());
                Ok(UpdateResult::default())
            }
        }
    }

    /// Sets the fields of `doc` on every matching document, with the same
    /// rules as [`update_one`](Session::update_one).
    pub fn update_many<T: Model>(self, doc: &T) -> MogulResult<UpdateResult> {
        match set_document(&doc.fields())? {
            Some(values) => self.update_by(Some(doc), doc! { OP_SET: values }, true),
            None => {
                log::warn!("update_many skipped, every field of {} is zero", T::type_name());
                Ok(UpdateResult::default())
            }
        }
    }

    /// Applies a raw update document to the first matching document.
    pub fn update_one_with<T: Model>(self, update: Document) -> MogulResult<UpdateResult> {
        self.update_by::<T>(None, update, false)
    }

    /// Applies a raw update document to every matching document.
    pub fn update_many_with<T: Model>(self, update: Document) -> MogulResult<UpdateResult> {
        self.update_by::<T>(None, update, true)
    }

    fn update_by<T: Model>(
        self,
        value: Option<&T>,
        update: Document,
        many: bool,
    ) -> MogulResult<UpdateResult> {
        let ns = self.namespace(value)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        let options = self.update_options.clone();

        if many {
            log::debug!("update_many on {} with filter {} and update {}", ns, filter, update);
            self.store.update_many(&ctx, &ns, filter, update, options)
        } else {
            log::debug!("update_one on {} with filter {} and update {}", ns, filter, update);
            self.store.update_one(&ctx, &ns, filter, update, options)
        }
    }

    /// Replaces the first matching document with `doc`.
    pub fn replace_one<T: Model>(self, doc: &T) -> MogulResult<UpdateResult> {
        let ns = self.namespace(Some(doc))?;
        let filter = self.filter_document()?;
        let replacement = to_document(doc)?;
        let ctx = self.context();
        log::debug!("replace_one on {} with filter {}", ns, filter);

        self.store
            .replace_one(&ctx, &ns, filter, replacement, self.update_options.clone())
    }

    /// Replaces the first matching document with `doc`, inserting it when
    /// nothing matches.
    pub fn upsert<T: Model>(self, doc: &T) -> MogulResult<UpdateResult> {
        self.set_upsert(true).replace_one(doc)
    }

    pub fn delete_one<T: Model>(self) -> MogulResult<DeleteResult> {
        let ns = self.namespace::<T>(None)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        log::debug!("delete_one on {} with filter {}", ns, filter);

        self.store
            .delete_one(&ctx, &ns, filter, self.delete_options.clone())
    }

    pub fn delete_many<T: Model>(self) -> MogulResult<DeleteResult> {
        let ns = self.namespace::<T>(None)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        log::debug!("delete_many on {} with filter {}", ns, filter);

        self.store
            .delete_many(&ctx, &ns, filter, self.delete_options.clone())
    }

    /// Marks the first matching document deleted by setting the soft
    /// delete field to the current time. The document stays stored.
    pub fn soft_delete_one<T: Model>(self) -> MogulResult<UpdateResult> {
        let update = self.soft_delete_update();
        self.update_by::<T>(None, update, false)
    }

    /// Marks every matching document deleted, see
    /// [`soft_delete_one`](Session::soft_delete_one).
    pub fn soft_delete_many<T: Model>(self) -> MogulResult<UpdateResult> {
        let update = self.soft_delete_update();
        self.update_by::<T>(None, update, true)
    }

    fn soft_delete_update(&self) -> Document {
        let mut values = Document::new();
        values.insert(self.soft_delete_field.clone(), DateTime::now());
        doc! { OP_SET: values }
    }

    /// Updates the first matching document and returns it, as it was
    /// before the update unless [`ReturnDocument::After`] was set.
    ///
    /// [`ReturnDocument::After`]: crate::options::ReturnDocument::After
    pub fn find_one_and_update<T: Model>(self, update: Document) -> MogulResult<T> {
        let ns = self.namespace::<T>(None)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        log::debug!(
            "find_one_and_update on {} with filter {} and update {}",
            ns,
            filter,
            update
        );

        match self.store.find_one_and_update(
            &ctx,
            &ns,
            filter,
            update,
            self.find_one_and_update_options.clone(),
        )? {
            Some(doc) => decode(doc),
            None => Err(no_documents("find_one_and_update")),
        }
    }

    pub fn find_one_and_replace<T: Model>(self, doc: &T) -> MogulResult<T> {
        let ns = self.namespace(Some(doc))?;
        let filter = self.filter_document()?;
        let replacement = to_document(doc)?;
        let ctx = self.context();
        log::debug!("find_one_and_replace on {} with filter {}", ns, filter);

        match self.store.find_one_and_replace(
            &ctx,
            &ns,
            filter,
            replacement,
            self.find_one_and_replace_options.clone(),
        )? {
            Some(doc) => decode(doc),
            None => Err(no_documents("find_one_and_replace")),
        }
    }

    pub fn find_one_and_delete<T: Model>(self) -> MogulResult<T> {
        let ns = self.namespace::<T>(None)?;
        let filter = self.filter_document()?;
        let ctx = self.context();
        log::debug!("find_one_and_delete on {} with filter {}", ns, filter);

        match self.store.find_one_and_delete(
            &ctx,
            &ns,
            filter,
            self.find_one_and_delete_options.clone(),
        )? {
            Some(doc) => decode(doc),
            None => Err(no_documents("find_one_and_delete")),
        }
    }

    /// Runs the write models in order against the collection of `T`.
    ///
    /// The session filter is not applied; each model carries its own.
    pub fn bulk_write<T: Model>(self, models: Vec<WriteModel>) -> MogulResult<BulkWriteResult> {
        self.check_target()?;
        // a broken chain must not reach the store
        self.filter_document()?;
        let ns = self.namespace::<T>(None)?;
        let ctx = self.context();
        log::debug!("bulk_write of {} models on {}", models.len(), ns);

        self.store
            .bulk_write(&ctx, &ns, models, self.bulk_write_options.clone())
    }

    /// The `$match` stage equivalent to the current filter.
    pub fn match_stage(&self) -> MogulResult<Document> {
        Ok(doc! { STAGE_MATCH: self.filter_document()? })
    }
}
