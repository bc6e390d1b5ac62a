use std::collections::HashMap;
use std::time::Duration;

use bson::{Bson, Document};

use super::Session;
use crate::common::SortOrder;
use crate::options::*;

impl Session {
    /// Sorts ascending on every field.
    ///
    /// The fields go through an unordered map first, so with several
    /// fields the key order of the sort is not defined. Use
    /// [`sort`](Session::sort) when it matters.
    pub fn asc<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.unordered_sort(fields, SortOrder::Ascending)
    }

    /// Sorts descending on every field, with the same ordering caveat as
    /// [`asc`](Session::asc).
    pub fn desc<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.unordered_sort(fields, SortOrder::Descending)
    }

    /// Sorts on the fields in argument order; a `-` prefix sorts that
    /// field descending.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// // {b: 1, a: -1}
    /// let session = client.session().sort(&["b", "-a"]);
    /// ```
    pub fn sort<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut spec = Document::new();
        for field in fields {
            let (name, order) = SortOrder::parse_field(field.as_ref());
            spec.insert(name, order.as_i32());
        }
        self.set_sort(spec)
    }

    fn unordered_sort<I, S>(self, fields: I, order: SortOrder) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: HashMap<String, i32> = fields
            .into_iter()
            .map(|field| (field.as_ref().to_string(), order.as_i32()))
            .collect();
        let mut spec = Document::new();
        for (key, direction) in keys {
            spec.insert(key, direction);
        }
        self.set_sort(spec)
    }

    fn set_sort(mut self, spec: Document) -> Self {
        self.find_options.sort = Some(spec.clone());
        self.find_one_and_update_options.sort = Some(spec.clone());
        self.find_one_and_replace_options.sort = Some(spec.clone());
        self.find_one_and_delete_options.sort = Some(spec);
        self
    }

    /// Maximum number of documents returned or counted.
    pub fn limit(mut self, limit: i64) -> Self {
        self.find_options.limit = Some(limit);
        self.count_options.limit = Some(limit.unsigned_abs());
        self
    }

    pub fn skip(mut self, skip: u64) -> Self {
        self.find_options.skip = Some(skip);
        self.count_options.skip = Some(skip);
        self
    }

    pub fn set_projection(mut self, projection: Document) -> Self {
        self.find_options.projection = Some(projection.clone());
        self.find_one_and_update_options.projection = Some(projection.clone());
        self.find_one_and_replace_options.projection = Some(projection.clone());
        self.find_one_and_delete_options.projection = Some(projection);
        self
    }

    pub fn set_collation(mut self, collation: Collation) -> Self {
        self.find_options.collation = Some(collation.clone());
        self.count_options.collation = Some(collation.clone());
        self.distinct_options.collation = Some(collation.clone());
        self.update_options.collation = Some(collation.clone());
        self.delete_options.collation = Some(collation.clone());
        self.find_one_and_update_options.collation = Some(collation.clone());
        self.find_one_and_replace_options.collation = Some(collation.clone());
        self.find_one_and_delete_options.collation = Some(collation);
        self
    }

    pub fn set_hint(mut self, hint: Hint) -> Self {
        self.find_options.hint = Some(hint.clone());
        self.count_options.hint = Some(hint.clone());
        self.update_options.hint = Some(hint.clone());
        self.delete_options.hint = Some(hint.clone());
        self.find_one_and_update_options.hint = Some(hint.clone());
        self.find_one_and_replace_options.hint = Some(hint.clone());
        self.find_one_and_delete_options.hint = Some(hint);
        self
    }

    pub fn set_upsert(mut self, upsert: bool) -> Self {
        self.update_options.upsert = Some(upsert);
        self.find_one_and_update_options.upsert = Some(upsert);
        self.find_one_and_replace_options.upsert = Some(upsert);
        self
    }

    pub fn set_return_document(mut self, return_document: ReturnDocument) -> Self {
        self.find_one_and_update_options.return_document = Some(return_document);
        self.find_one_and_replace_options.return_document = Some(return_document);
        self
    }

    pub fn set_array_filters(mut self, array_filters: Vec<Document>) -> Self {
        self.update_options.array_filters = Some(array_filters.clone());
        self.find_one_and_update_options.array_filters = Some(array_filters);
        self
    }

    pub fn set_bypass_document_validation(mut self, bypass: bool) -> Self {
        self.update_options.bypass_document_validation = Some(bypass);
        self.insert_one_options.bypass_document_validation = Some(bypass);
        self.insert_many_options.bypass_document_validation = Some(bypass);
        self.bulk_write_options.bypass_document_validation = Some(bypass);
        self.find_one_and_update_options.bypass_document_validation = Some(bypass);
        self.find_one_and_replace_options.bypass_document_validation = Some(bypass);
        self
    }

    /// Server-side time limit of the operation.
    pub fn set_max_time(mut self, max_time: Duration) -> Self {
        self.find_options.max_time = Some(max_time);
        self.count_options.max_time = Some(max_time);
        self.distinct_options.max_time = Some(max_time);
        self.find_one_and_update_options.max_time = Some(max_time);
        self.find_one_and_replace_options.max_time = Some(max_time);
        self.find_one_and_delete_options.max_time = Some(max_time);
        self
    }

    pub fn set_batch_size(mut self, batch_size: u32) -> Self {
        self.find_options.batch_size = Some(batch_size);
        self
    }

    pub fn set_allow_disk_use(mut self, allow_disk_use: bool) -> Self {
        self.find_options.allow_disk_use = Some(allow_disk_use);
        self
    }

    /// Whether multi-document writes stop at the first failure.
    pub fn set_ordered(mut self, ordered: bool) -> Self {
        self.insert_many_options.ordered = Some(ordered);
        self.bulk_write_options.ordered = Some(ordered);
        self
    }

    pub fn find_options(&self) -> &FindOptions {
        &self.find_options
    }

    pub fn count_options(&self) -> &CountOptions {
        &self.count_options
    }

    pub fn distinct_options(&self) -> &DistinctOptions {
        &self.distinct_options
    }

    pub fn update_options(&self) -> &UpdateOptions {
        &self.update_options
    }

    pub fn delete_options(&self) -> &DeleteOptions {
        &self.delete_options
    }

    pub fn insert_one_options(&self) -> &InsertOneOptions {
        &self.insert_one_options
    }

    pub fn insert_many_options(&self) -> &InsertManyOptions {
        &self.insert_many_options
    }

    pub fn bulk_write_options(&self) -> &BulkWriteOptions {
        &self.bulk_write_options
    }

    pub fn find_one_and_update_options(&self) -> &FindOneAndUpdateOptions {
        &self.find_one_and_update_options
    }

    pub fn find_one_and_replace_options(&self) -> &FindOneAndReplaceOptions {
        &self.find_one_and_replace_options
    }

    pub fn find_one_and_delete_options(&self) -> &FindOneAndDeleteOptions {
        &self.find_one_and_delete_options
    }

    /// The sort as ordered `(field, direction)` pairs.
    pub fn sort_pairs(&self) -> Vec<(String, i32)> {
        match &self.find_options.sort {
            Some(spec) => spec
                .iter()
                .map(|(key, value)| {
                    let direction = match value {
                        Bson::Int32(n) => *n,
                        Bson::Int64(n) => (*n).signum() as i32,
                        _ => 1,
                    };
                    (key.clone(), direction)
                })
                .collect(),
            None => Vec::new(),
        }
    }
}
