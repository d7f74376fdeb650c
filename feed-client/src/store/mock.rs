//! Mock record store for testing.
//!
//! Holds records in memory, answers radius queries with real haversine
//! filtering, captures writes for verification, and supports forced failures.

use super::{RecordStore, StoreError};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use nearcast_types::{GeoPoint, Post, PostDraft, PostId, Radius};

/// Mock record store for testing.
#[derive(Debug, Default)]
pub struct MockRecordStore {
    inner: Arc<Mutex<MockStoreInner>>,
}

#[derive(Debug, Default)]
struct MockStoreInner {
    records: Vec<Post>,
    written: Vec<Post>,
    query_count: usize,
    fail_next_write: Option<String>,
    fail_all_writes: Option<String>,
    fail_next_query: Option<String>,
}

impl MockRecordStore {
    /// Create a new, empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record as if another client had written it.
    pub fn seed_post(&self, post: Post) {
        let mut inner = self.inner.lock().unwrap();
        inner.records.push(post);
    }

    /// Replace the whole record set, keeping write/query bookkeeping.
    pub fn set_records(&self, records: Vec<Post>) {
        let mut inner = self.inner.lock().unwrap();
        inner.records = records;
    }

    /// All posts written through this store, in write order.
    pub fn written_posts(&self) -> Vec<Post> {
        let inner = self.inner.lock().unwrap();
        inner.written.clone()
    }

    /// Number of writes attempted successfully.
    pub fn write_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.written.len()
    }

    /// Number of queries served (successful or failed).
    pub fn query_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.query_count
    }

    /// Cause the next write() to fail with the given error.
    pub fn fail_next_write(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_write = Some(error.to_string());
    }

    /// Cause every write() to fail with the given error until reset.
    pub fn fail_all_writes(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_all_writes = Some(error.to_string());
    }

    /// Cause the next query() to fail with the given error.
    pub fn fail_next_query(&self, error: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.fail_next_query = Some(error.to_string());
    }

    /// Clear all records and bookkeeping.
    pub fn reset(&self) {
        let mut inner = self.inner.lock().unwrap();
        *inner = MockStoreInner::default();
    }
}

impl Clone for MockRecordStore {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn write(&self, draft: &PostDraft) -> Result<PostId, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(error) = inner.fail_next_write.take() {
            return Err(StoreError::WriteFailed(error));
        }
        if let Some(error) = &inner.fail_all_writes {
            return Err(StoreError::WriteFailed(error.clone()));
        }

        let post = draft.clone().into_post();
        inner.written.push(post.clone());
        inner.records.push(post);
        Ok(draft.id)
    }

    async fn query(&self, center: GeoPoint, radius: Radius) -> Result<Vec<Post>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.query_count += 1;

        if let Some(error) = inner.fail_next_query.take() {
            return Err(StoreError::QueryFailed(error));
        }

        Ok(inner
            .records
            .iter()
            .filter(|p| radius.contains(&center, &p.location))
            .cloned()
            .collect())
    }
}
