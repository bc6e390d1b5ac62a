use std::cmp::Ordering;
use std::sync::Arc;

use bson::oid::ObjectId;
use bson::{Bson, Document};
use dashmap::DashMap;
use indexmap::IndexMap;

use super::compare::{compare_values, values_equal};
use super::matcher::{matches, resolve_path, truthy};
use super::updater::{apply_update, is_replacement, seed_from_filter, set_path, unset_path};
use crate::common::*;
use crate::errors::{ErrorKind, MogulError, MogulResult};
use crate::options::*;
use crate::store::{
    BulkWriteResult, DeleteResult, DocumentCursor, DocumentStore, InsertManyResult,
    InsertOneResult, Namespace, UpdateResult, WriteModel,
};

const ID_INDEX: &str = "_id_";

/// An in-process [`DocumentStore`].
///
/// Collections are created on first write and live as long as the store.
/// Clones share the same data. Each collection is guarded by its own lock,
/// so operations on different collections never contend.
///
/// # Examples
///
/// ```rust,ignore
/// use mogul::store::MemoryStore;
/// use mogul::Client;
///
/// let client = Client::builder().database("shop").build(MemoryStore::new())?;
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryStoreInner>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Names of the collections of a database, sorted.
    pub fn collection_names(&self, database: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .inner
            .collections
            .iter()
            .filter(|entry| entry.key().database == database)
            .map(|entry| entry.key().collection.clone())
            .collect();
        names.sort();
        names
    }

    /// Snapshot of every document of a collection, in insertion order.
    pub fn documents(&self, ns: &Namespace) -> Vec<Document> {
        match self.inner.existing(ns) {
            Some(collection) => collection.read().documents.clone(),
            None => Vec::new(),
        }
    }

    /// Names of the indexes of a collection, `_id_` first.
    pub fn index_names(&self, ns: &Namespace) -> Vec<String> {
        let mut names = vec![ID_INDEX.to_string()];
        if let Some(collection) = self.inner.existing(ns) {
            names.extend(collection.read().indexes.keys().cloned());
        }
        names
    }
}

#[derive(Default)]
struct MemoryStoreInner {
    collections: DashMap<Namespace, Atomic<CollectionData>>,
}

impl MemoryStoreInner {
    fn existing(&self, ns: &Namespace) -> Option<Atomic<CollectionData>> {
        self.collections.get(ns).map(|entry| entry.value().clone())
    }

    fn collection(&self, ns: &Namespace) -> Atomic<CollectionData> {
        self.collections
            .entry(ns.clone())
            .or_insert_with(|| atomic(CollectionData::default()))
            .clone()
    }

    fn read_documents(
        &self,
        ns: &Namespace,
        filter: &Document,
    ) -> MogulResult<Vec<Document>> {
        let Some(collection) = self.existing(ns) else {
            return Ok(Vec::new());
        };
        let data = collection.read();
        let mut result = Vec::new();
        for doc in &data.documents {
            if matches(doc, filter)? {
                result.push(doc.clone());
            }
        }
        Ok(result)
    }
}

#[derive(Default)]
struct CollectionData {
    documents: Vec<Document>,
    indexes: IndexMap<String, IndexModel>,
}

impl CollectionData {
    fn matching_positions(&self, filter: &Document) -> MogulResult<Vec<usize>> {
        let mut positions = Vec::new();
        for (pos, doc) in self.documents.iter().enumerate() {
            if matches(doc, filter)? {
                positions.push(pos);
            }
        }
        Ok(positions)
    }

    fn first_position(
        &self,
        filter: &Document,
        sort: Option<&Document>,
    ) -> MogulResult<Option<usize>> {
        let mut positions = self.matching_positions(filter)?;
        if let Some(sort) = sort {
            positions.sort_by(|a, b| compare_by(sort, &self.documents[*a], &self.documents[*b]));
        }
        Ok(positions.first().copied())
    }

    fn check_unique(&self, doc: &Document, skip: Option<usize>) -> MogulResult<()> {
        let others = || {
            self.documents
                .iter()
                .enumerate()
                .filter(move |(pos, _)| Some(*pos) != skip)
                .map(|(_, other)| other)
        };

        if let Some(id) = doc.get(DOC_ID) {
            if others().any(|other| other.get(DOC_ID).is_some_and(|o| values_equal(o, id))) {
                return Err(duplicate_key(ID_INDEX, id));
            }
        }

        for (name, index) in self.indexes.iter().filter(|(_, index)| index.is_unique()) {
            let Some(key) = index_key(doc, index) else {
                continue;
            };
            let clash = others().any(|other| {
                index_key(other, index).is_some_and(|other_key| keys_equal(&key, &other_key))
            });
            if clash {
                return Err(duplicate_key(name, &Bson::Array(key)));
            }
        }
        Ok(())
    }

    fn insert(&mut self, doc: Document) -> MogulResult<Bson> {
        let (doc, id) = ensure_id(doc);
        self.check_unique(&doc, None)?;
        self.documents.push(doc);
        Ok(id)
    }

    /// Applies an update in place, returning whether the document changed.
    fn update_at(&mut self, pos: usize, update: &Document) -> MogulResult<bool> {
        let mut updated = self.documents[pos].clone();
        apply_update(&mut updated, update)?;
        if updated == self.documents[pos] {
            return Ok(false);
        }
        self.check_unique(&updated, Some(pos))?;
        self.documents[pos] = updated;
        Ok(true)
    }

    /// Inserts the document an upsert creates when nothing matched.
    fn upsert(&mut self, filter: &Document, update: &Document) -> MogulResult<(Bson, Document)> {
        let seed = seed_from_filter(filter)?;
        let mut doc = if is_replacement(update) {
            let mut doc = Document::new();
            if let Some(id) = seed.get(DOC_ID) {
                doc.insert(DOC_ID, id.clone());
            }
            for (key, value) in update {
                doc.insert(key.clone(), value.clone());
            }
            doc
        } else {
            let mut doc = seed;
            apply_update(&mut doc, update)?;
            doc
        };
        if !doc.contains_key(DOC_ID) {
            doc = ensure_id(doc).0;
        }
        let id = self.insert(doc.clone())?;
        Ok((id, doc))
    }

    fn update(
        &mut self,
        filter: &Document,
        update: &Document,
        upsert: bool,
        multi: bool,
    ) -> MogulResult<UpdateResult> {
        let mut positions = self.matching_positions(filter)?;
        if !multi {
            positions.truncate(1);
        }

        if positions.is_empty() {
            if upsert {
                let (id, _) = self.upsert(filter, update)?;
                return Ok(UpdateResult {
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: Some(id),
                });
            }
            return Ok(UpdateResult::default());
        }

        let mut result = UpdateResult {
            matched_count: positions.len() as u64,
            ..Default::default()
        };
        for pos in positions {
            if self.update_at(pos, update)? {
                result.modified_count += 1;
            }
        }
        Ok(result)
    }

    fn delete(&mut self, filter: &Document, multi: bool) -> MogulResult<DeleteResult> {
        let mut positions = self.matching_positions(filter)?;
        if !multi {
            positions.truncate(1);
        }
        for pos in positions.iter().rev() {
            self.documents.remove(*pos);
        }
        Ok(DeleteResult {
            deleted_count: positions.len() as u64,
        })
    }
}

fn ensure_id(doc: Document) -> (Document, Bson) {
    if let Some(id) = doc.get(DOC_ID) {
        let id = id.clone();
        return (doc, id);
    }
    let id = Bson::ObjectId(ObjectId::new());
    let mut with_id = Document::new();
    with_id.insert(DOC_ID, id.clone());
    for (key, value) in doc {
        with_id.insert(key, value);
    }
    (with_id, id)
}

/// Values of the index keys in a document; `None` for sparse indexes when
/// every key is missing.
fn index_key(doc: &Document, index: &IndexModel) -> Option<Vec<Bson>> {
    let mut missing = 0;
    let key: Vec<Bson> = index
        .keys
        .keys()
        .map(|field| match resolve_path(doc, field).into_iter().next() {
            Some(value) => value,
            None => {
                missing += 1;
                Bson::Null
            }
        })
        .collect();
    let sparse = index.options.sparse.unwrap_or(false);
    if sparse && missing == key.len() {
        None
    } else {
        Some(key)
    }
}

fn keys_equal(a: &[Bson], b: &[Bson]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| values_equal(x, y))
}

fn duplicate_key(index: &str, key: &Bson) -> MogulError {
    MogulError::new(
        &format!("duplicate key error, index: {} dup key: {}", index, key),
        ErrorKind::DuplicateKey,
    )
}

fn sort_value(doc: &Document, field: &str) -> Bson {
    resolve_path(doc, field)
        .into_iter()
        .next()
        .unwrap_or(Bson::Null)
}

fn compare_by(sort: &Document, a: &Document, b: &Document) -> Ordering {
    for (field, direction) in sort {
        let ord = compare_values(&sort_value(a, field), &sort_value(b, field));
        let ord = if is_descending(direction) { ord.reverse() } else { ord };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

fn is_descending(direction: &Bson) -> bool {
    match direction {
        Bson::Int32(n) => *n < 0,
        Bson::Int64(n) => *n < 0,
        Bson::Double(n) => *n < 0.0,
        _ => false,
    }
}

fn sort_documents(documents: &mut [Document], sort: &Document) {
    documents.sort_by(|a, b| compare_by(sort, a, b));
}

fn project(doc: &Document, projection: &Document) -> MogulResult<Document> {
    let include_id = projection.get(DOC_ID).map_or(true, truthy);
    let inclusive = projection
        .iter()
        .any(|(field, flag)| field != DOC_ID && truthy(flag));

    if inclusive {
        let mut out = Document::new();
        if include_id {
            if let Some(id) = doc.get(DOC_ID) {
                out.insert(DOC_ID, id.clone());
            }
        }
        for (field, flag) in projection {
            if field == DOC_ID || !truthy(flag) {
                continue;
            }
            if let Some(value) = resolve_path(doc, field).into_iter().next() {
                set_path(&mut out, field, value)?;
            }
        }
        Ok(out)
    } else {
        let mut out = doc.clone();
        for (field, flag) in projection {
            if !truthy(flag) {
                unset_path(&mut out, field);
            }
        }
        Ok(out)
    }
}

fn project_all(documents: Vec<Document>, projection: Option<&Document>) -> MogulResult<Vec<Document>> {
    match projection {
        Some(projection) => documents.iter().map(|doc| project(doc, projection)).collect(),
        None => Ok(documents),
    }
}

fn project_one(doc: Option<Document>, projection: Option<&Document>) -> MogulResult<Option<Document>> {
    match (doc, projection) {
        (Some(doc), Some(projection)) => project(&doc, projection).map(Some),
        (doc, _) => Ok(doc),
    }
}

fn window(documents: Vec<Document>, skip: Option<u64>, limit: Option<u64>) -> Vec<Document> {
    let skip = usize::try_from(skip.unwrap_or(0)).unwrap_or(usize::MAX);
    let iter = documents.into_iter().skip(skip);
    match limit {
        Some(limit) if limit > 0 => iter
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect(),
        _ => iter.collect(),
    }
}

fn as_count(value: &Bson, stage: &str) -> MogulResult<u64> {
    let count = match value {
        Bson::Int32(n) => u64::try_from(*n).ok(),
        Bson::Int64(n) => u64::try_from(*n).ok(),
        Bson::Double(n) if *n >= 0.0 => Some(*n as u64),
        _ => None,
    };
    count.ok_or_else(|| {
        MogulError::new(
            &format!("{} needs a non-negative number", stage),
            ErrorKind::InvalidOperation,
        )
    })
}

fn collect_errors(ordered: bool, first_error: &mut Option<MogulError>, err: MogulError) -> MogulResult<()> {
    if ordered {
        return Err(err);
    }
    if first_error.is_none() {
        *first_error = Some(err);
    }
    Ok(())
}

impl DocumentStore for MemoryStore {
    fn find(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOptions,
    ) -> MogulResult<DocumentCursor> {
        ctx.check()?;
        let mut documents = self.inner.read_documents(ns, &filter)?;
        if let Some(sort) = &options.sort {
            sort_documents(&mut documents, sort);
        }
        let limit = options.limit.map(i64::unsigned_abs);
        let documents = window(documents, options.skip, limit);
        let documents = project_all(documents, options.projection.as_ref())?;
        log::trace!("Found {} documents in {}", documents.len(), ns);
        Ok(DocumentCursor::from_documents(documents))
    }

    fn find_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOptions,
    ) -> MogulResult<Option<Document>> {
        let options = FindOptions {
            limit: Some(1),
            ..options
        };
        let mut cursor = self.find(ctx, ns, filter, options)?;
        cursor.next().transpose()
    }

    fn find_one_and_update(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: FindOneAndUpdateOptions,
    ) -> MogulResult<Option<Document>> {
        ctx.check()?;
        if is_replacement(&update) {
            return Err(MogulError::new(
                "update document must contain only update operators",
                ErrorKind::InvalidOperation,
            ));
        }
        let collection = self.inner.collection(ns);
        let mut data = collection.write();
        let return_after = options.return_document == Some(ReturnDocument::After);

        let found = match data.first_position(&filter, options.sort.as_ref())? {
            Some(pos) => {
                let before = data.documents[pos].clone();
                data.update_at(pos, &update)?;
                if return_after {
                    Some(data.documents[pos].clone())
                } else {
                    Some(before)
                }
            }
            None if options.upsert.unwrap_or(false) => {
                let (_, inserted) = data.upsert(&filter, &update)?;
                return_after.then_some(inserted)
            }
            None => None,
        };
        project_one(found, options.projection.as_ref())
    }

    fn find_one_and_replace(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        replacement: Document,
        options: FindOneAndReplaceOptions,
    ) -> MogulResult<Option<Document>> {
        ctx.check()?;
        if !is_replacement(&replacement) {
            return Err(MogulError::new(
                "replacement document must not contain update operators",
                ErrorKind::InvalidOperation,
            ));
        }
        let collection = self.inner.collection(ns);
        let mut data = collection.write();
        let return_after = options.return_document == Some(ReturnDocument::After);

        let found = match data.first_position(&filter, options.sort.as_ref())? {
            Some(pos) => {
                let before = data.documents[pos].clone();
                data.update_at(pos, &replacement)?;
                if return_after {
                    Some(data.documents[pos].clone())
                } else {
                    Some(before)
                }
            }
            None if options.upsert.unwrap_or(false) => {
                let (_, inserted) = data.upsert(&filter, &replacement)?;
                return_after.then_some(inserted)
            }
            None => None,
        };
        project_one(found, options.projection.as_ref())
    }

    fn find_one_and_delete(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOneAndDeleteOptions,
    ) -> MogulResult<Option<Document>> {
        ctx.check()?;
        let Some(collection) = self.inner.existing(ns) else {
            return Ok(None);
        };
        let mut data = collection.write();
        let found = data
            .first_position(&filter, options.sort.as_ref())?
            .map(|pos| data.documents.remove(pos));
        project_one(found, options.projection.as_ref())
    }

    fn insert_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        document: Document,
        _options: InsertOneOptions,
    ) -> MogulResult<InsertOneResult> {
        ctx.check()?;
        let collection = self.inner.collection(ns);
        let inserted_id = collection.write().insert(document)?;
        Ok(InsertOneResult { inserted_id })
    }

    fn insert_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        documents: Vec<Document>,
        options: InsertManyOptions,
    ) -> MogulResult<InsertManyResult> {
        ctx.check()?;
        let ordered = options.ordered.unwrap_or(true);
        let collection = self.inner.collection(ns);
        let mut data = collection.write();

        let mut result = InsertManyResult::default();
        let mut first_error = None;
        for (pos, document) in documents.into_iter().enumerate() {
            match data.insert(document) {
                Ok(id) => {
                    result.inserted_ids.insert(pos, id);
                }
                Err(err) => collect_errors(ordered, &mut first_error, err)?,
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(result),
        }
    }

    fn update_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult> {
        ctx.check()?;
        let collection = self.inner.collection(ns);
        let mut data = collection.write();
        data.update(&filter, &update, options.upsert.unwrap_or(false), false)
    }

    fn update_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult> {
        ctx.check()?;
        if is_replacement(&update) {
            return Err(MogulError::new(
                "update_many needs update operators",
                ErrorKind::InvalidOperation,
            ));
        }
        let collection = self.inner.collection(ns);
        let mut data = collection.write();
        data.update(&filter, &update, options.upsert.unwrap_or(false), true)
    }

    fn replace_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        replacement: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult> {
        ctx.check()?;
        if !is_replacement(&replacement) {
            return Err(MogulError::new(
                "replacement document must not contain update operators",
                ErrorKind::InvalidOperation,
            ));
        }
        let collection = self.inner.collection(ns);
        let mut data = collection.write();
        data.update(&filter, &replacement, options.upsert.unwrap_or(false), false)
    }

    fn delete_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        _options: DeleteOptions,
    ) -> MogulResult<DeleteResult> {
        ctx.check()?;
        match self.inner.existing(ns) {
            Some(collection) => collection.write().delete(&filter, false),
            None => Ok(DeleteResult::default()),
        }
    }

    fn delete_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        _options: DeleteOptions,
    ) -> MogulResult<DeleteResult> {
        ctx.check()?;
        match self.inner.existing(ns) {
            Some(collection) => collection.write().delete(&filter, true),
            None => Ok(DeleteResult::default()),
        }
    }

    fn bulk_write(
        &self,
        ctx: &Context,
        ns: &Namespace,
        models: Vec<WriteModel>,
        options: BulkWriteOptions,
    ) -> MogulResult<BulkWriteResult> {
        ctx.check()?;
        let ordered = options.ordered.unwrap_or(true);
        let collection = self.inner.collection(ns);
        let mut data = collection.write();

        let mut result = BulkWriteResult::default();
        let mut first_error = None;
        for (pos, model) in models.into_iter().enumerate() {
            let outcome = match model {
                WriteModel::InsertOne { document } => data.insert(document).map(|id| {
                    result.inserted_count += 1;
                    result.inserted_ids.insert(pos, id);
                }),
                WriteModel::UpdateOne { filter, update, upsert }
                | WriteModel::ReplaceOne {
                    filter,
                    replacement: update,
                    upsert,
                } => data
                    .update(&filter, &update, upsert.unwrap_or(false), false)
                    .map(|r| merge_update(&mut result, pos, r)),
                WriteModel::UpdateMany { filter, update, upsert } => data
                    .update(&filter, &update, upsert.unwrap_or(false), true)
                    .map(|r| merge_update(&mut result, pos, r)),
                WriteModel::DeleteOne { filter } => data
                    .delete(&filter, false)
                    .map(|r| result.deleted_count += r.deleted_count),
                WriteModel::DeleteMany { filter } => data
                    .delete(&filter, true)
                    .map(|r| result.deleted_count += r.deleted_count),
            };
            if let Err(err) = outcome {
                collect_errors(ordered, &mut first_error, err)?;
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(result),
        }
    }

    fn count_documents(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: CountOptions,
    ) -> MogulResult<u64> {
        ctx.check()?;
        let documents = self.inner.read_documents(ns, &filter)?;
        Ok(window(documents, options.skip, options.limit).len() as u64)
    }

    fn distinct(
        &self,
        ctx: &Context,
        ns: &Namespace,
        field: &str,
        filter: Document,
        _options: DistinctOptions,
    ) -> MogulResult<Vec<Bson>> {
        ctx.check()?;
        let mut values: Vec<Bson> = Vec::new();
        for doc in self.inner.read_documents(ns, &filter)? {
            for value in resolve_path(&doc, field) {
                let flattened = match value {
                    Bson::Array(items) => items,
                    other => vec![other],
                };
                for item in flattened {
                    if !values.iter().any(|seen| values_equal(seen, &item)) {
                        values.push(item);
                    }
                }
            }
        }
        Ok(values)
    }

    fn aggregate(
        &self,
        ctx: &Context,
        ns: &Namespace,
        pipeline: Vec<Document>,
        _options: AggregateOptions,
    ) -> MogulResult<DocumentCursor> {
        ctx.check()?;
        let mut documents = self.documents(ns);
        for stage in &pipeline {
            let Some((name, spec)) = stage.iter().next() else {
                return Err(MogulError::new(
                    "empty pipeline stage",
                    ErrorKind::InvalidOperation,
                ));
            };
            documents = match (name.as_str(), spec) {
                (STAGE_MATCH, Bson::Document(filter)) => {
                    let mut kept = Vec::with_capacity(documents.len());
                    for doc in documents {
                        if matches(&doc, filter)? {
                            kept.push(doc);
                        }
                    }
                    kept
                }
                (STAGE_SORT, Bson::Document(sort)) => {
                    sort_documents(&mut documents, sort);
                    documents
                }
                (STAGE_SKIP, value) => window(documents, Some(as_count(value, STAGE_SKIP)?), None),
                (STAGE_LIMIT, value) => {
                    window(documents, None, Some(as_count(value, STAGE_LIMIT)?))
                }
                (STAGE_PROJECT, Bson::Document(projection)) => {
                    project_all(documents, Some(projection))?
                }
                (STAGE_COUNT, Bson::String(field)) => {
                    let count = i32::try_from(documents.len())
                        .map(Bson::Int32)
                        .unwrap_or(Bson::Int64(documents.len() as i64));
                    let mut doc = Document::new();
                    doc.insert(field.clone(), count);
                    vec![doc]
                }
                (name, _) => {
                    log::error!("Unsupported pipeline stage {}", name);
                    return Err(MogulError::new(
                        &format!("unsupported pipeline stage {}", name),
                        ErrorKind::UnsupportedOperator,
                    ));
                }
            };
        }
        Ok(DocumentCursor::from_documents(documents))
    }

    fn create_indexes(
        &self,
        ctx: &Context,
        ns: &Namespace,
        models: Vec<IndexModel>,
        _options: CreateIndexOptions,
    ) -> MogulResult<Vec<String>> {
        ctx.check()?;
        let collection = self.inner.collection(ns);
        let mut data = collection.write();

        let mut names = Vec::with_capacity(models.len());
        for model in models {
            let name = model.index_name();
            if model.is_unique() {
                let keys: Vec<Vec<Bson>> = data
                    .documents
                    .iter()
                    .filter_map(|doc| index_key(doc, &model))
                    .collect();
                for (i, key) in keys.iter().enumerate() {
                    if keys[i + 1..].iter().any(|other| keys_equal(key, other)) {
                        return Err(duplicate_key(&name, &Bson::Array(key.clone())));
                    }
                }
            }
            data.indexes.insert(name.clone(), model);
            names.push(name);
        }
        Ok(names)
    }

    fn drop_index(&self, ctx: &Context, ns: &Namespace, name: &str) -> MogulResult<()> {
        ctx.check()?;
        if name == ID_INDEX {
            return Err(MogulError::new(
                "cannot drop the _id index",
                ErrorKind::InvalidOperation,
            ));
        }
        let removed = self
            .inner
            .existing(ns)
            .and_then(|collection| collection.write().indexes.shift_remove(name));
        match removed {
            Some(_) => Ok(()),
            None => Err(MogulError::new(
                &format!("index not found with name [{}]", name),
                ErrorKind::BackendError,
            )),
        }
    }

    fn drop_indexes(&self, ctx: &Context, ns: &Namespace) -> MogulResult<()> {
        ctx.check()?;
        if let Some(collection) = self.inner.existing(ns) {
            collection.write().indexes.clear();
        }
        Ok(())
    }
}

fn merge_update(result: &mut BulkWriteResult, pos: usize, update: UpdateResult) {
    result.matched_count += update.matched_count;
    result.modified_count += update.modified_count;
    if let Some(id) = update.upserted_id {
        result.upserted_count += 1;
        result.upserted_ids.insert(pos, id);
    }
}
