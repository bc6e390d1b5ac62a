use bson::{Bson, Document};
use mogul::common::Context;
use mogul::errors::MogulResult;
use mogul::options::*;
use mogul::store::*;
use mogul::Client;
use parking_lot::Mutex;
use std::sync::Arc;

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even when the test fails; a failure of any step
/// panics with its error.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> MogulResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> MogulResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> MogulResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_ctx = ctx.clone();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || test(test_ctx)));
    let after_result = after(ctx);
    if let Err(e) = &after_result {
        log::error!("Cleanup failed: {}", e);
    }

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic) => std::panic::resume_unwind(panic),
    }
    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    client: Client,
    store: RecordingStore,
}

impl TestContext {
    pub fn new(client: Client, store: RecordingStore) -> Self {
        Self { client, store }
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    pub fn store(&self) -> RecordingStore {
        self.store.clone()
    }
}

pub const TEST_DATABASE: &str = "mogul_test";

/// A client over a fresh recording in-memory store.
pub fn create_test_context() -> MogulResult<TestContext> {
    let store = RecordingStore::new();
    let client = Client::builder()
        .database(TEST_DATABASE)
        .build(store.clone())?;
    Ok(TestContext::new(client, store))
}

pub fn cleanup(ctx: TestContext) -> MogulResult<()> {
    ctx.store().clear();
    Ok(())
}

/// One call that reached the store.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub operation: &'static str,
    pub namespace: Namespace,
    pub filter: Option<Document>,
    pub update: Option<Document>,
}

/// A [`MemoryStore`] that records every call it receives.
#[derive(Clone, Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl RecordingStore {
    pub fn new() -> Self {
        RecordingStore::default()
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.inner
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.calls.lock().iter().map(|call| call.operation).collect()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.inner
            .documents(&Namespace::new(TEST_DATABASE, collection))
    }

    fn record(
        &self,
        operation: &'static str,
        ns: &Namespace,
        filter: Option<&Document>,
        update: Option<&Document>,
    ) {
        self.calls.lock().push(RecordedCall {
            operation,
            namespace: ns.clone(),
            filter: filter.cloned(),
            update: update.cloned(),
        });
    }
}

impl DocumentStore for RecordingStore {
    fn find(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOptions,
    ) -> MogulResult<DocumentCursor> {
        self.record("find", ns, Some(&filter), None);
        self.inner.find(ctx, ns, filter, options)
    }

    fn find_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOptions,
    ) -> MogulResult<Option<Document>> {
        self.record("find_one", ns, Some(&filter), None);
        self.inner.find_one(ctx, ns, filter, options)
    }

    fn find_one_and_update(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: FindOneAndUpdateOptions,
    ) -> MogulResult<Option<Document>> {
        self.record("find_one_and_update", ns, Some(&filter), Some(&update));
        self.inner
            .find_one_and_update(ctx, ns, filter, update, options)
    }

    fn find_one_and_replace(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        replacement: Document,
        options: FindOneAndReplaceOptions,
    ) -> MogulResult<Option<Document>> {
        self.record("find_one_and_replace", ns, Some(&filter), Some(&replacement));
        self.inner
            .find_one_and_replace(ctx, ns, filter, replacement, options)
    }

    fn find_one_and_delete(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: FindOneAndDeleteOptions,
    ) -> MogulResult<Option<Document>> {
        self.record("find_one_and_delete", ns, Some(&filter), None);
        self.inner.find_one_and_delete(ctx, ns, filter, options)
    }

    fn insert_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        document: Document,
        options: InsertOneOptions,
    ) -> MogulResult<InsertOneResult> {
        self.record("insert_one", ns, None, None);
        self.inner.insert_one(ctx, ns, document, options)
    }

    fn insert_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        documents: Vec<Document>,
        options: InsertManyOptions,
    ) -> MogulResult<InsertManyResult> {
        self.record("insert_many", ns, None, None);
        self.inner.insert_many(ctx, ns, documents, options)
    }

    fn update_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult> {
        self.record("update_one", ns, Some(&filter), Some(&update));
        self.inner.update_one(ctx, ns, filter, update, options)
    }

    fn update_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        update: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult> {
        self.record("update_many", ns, Some(&filter), Some(&update));
        self.inner.update_many(ctx, ns, filter, update, options)
    }

    fn replace_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        replacement: Document,
        options: UpdateOptions,
    ) -> MogulResult<UpdateResult> {
        self.record("replace_one", ns, Some(&filter), Some(&replacement));
        self.inner.replace_one(ctx, ns, filter, replacement, options)
    }

    fn delete_one(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: DeleteOptions,
    ) -> MogulResult<DeleteResult> {
        self.record("delete_one", ns, Some(&filter), None);
        self.inner.delete_one(ctx, ns, filter, options)
    }

    fn delete_many(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: DeleteOptions,
    ) -> MogulResult<DeleteResult> {
        self.record("delete_many", ns, Some(&filter), None);
        self.inner.delete_many(ctx, ns, filter, options)
    }

    fn bulk_write(
        &self,
        ctx: &Context,
        ns: &Namespace,
        models: Vec<WriteModel>,
        options: BulkWriteOptions,
    ) -> MogulResult<BulkWriteResult> {
        self.record("bulk_write", ns, None, None);
        self.inner.bulk_write(ctx, ns, models, options)
    }

    fn count_documents(
        &self,
        ctx: &Context,
        ns: &Namespace,
        filter: Document,
        options: CountOptions,
    ) -> MogulResult<u64> {
        self.record("count_documents", ns, Some(&filter), None);
        self.inner.count_documents(ctx, ns, filter, options)
    }

    fn distinct(
        &self,
        ctx: &Context,
        ns: &Namespace,
        field: &str,
        filter: Document,
        options: DistinctOptions,
    ) -> MogulResult<Vec<Bson>> {
        self.record("distinct", ns, Some(&filter), None);
        self.inner.distinct(ctx, ns, field, filter, options)
    }

    fn aggregate(
        &self,
        ctx: &Context,
        ns: &Namespace,
        pipeline: Vec<Document>,
        options: AggregateOptions,
    ) -> MogulResult<DocumentCursor> {
        self.record("aggregate", ns, None, None);
        self.inner.aggregate(ctx, ns, pipeline, options)
    }

    fn create_indexes(
        &self,
        ctx: &Context,
        ns: &Namespace,
        models: Vec<IndexModel>,
        options: CreateIndexOptions,
    ) -> MogulResult<Vec<String>> {
        self.record("create_indexes", ns, None, None);
        self.inner.create_indexes(ctx, ns, models, options)
    }

    fn drop_index(&self, ctx: &Context, ns: &Namespace, name: &str) -> MogulResult<()> {
        self.record("drop_index", ns, None, None);
        self.inner.drop_index(ctx, ns, name)
    }

    fn drop_indexes(&self, ctx: &Context, ns: &Namespace) -> MogulResult<()> {
        self.record("drop_indexes", ns, None, None);
        self.inner.drop_indexes(ctx, ns)
    }
}

pub fn is_sorted<T: Ord>(iterable: impl IntoIterator<Item = T>, ascending: bool) -> bool {
    let mut iter = iterable.into_iter();
    if let Some(mut prev) = iter.next() {
        for current in iter {
            if ascending {
                if prev > current {
                    return false;
                }
            } else if prev < current {
                return false;
            }
            prev = current;
        }
    }
    true
}
