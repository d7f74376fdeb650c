//! Record store abstraction.
//!
//! The remote store is an opaque, queryable, append-only collection of posts.
//! This module pins down the two operations the feed needs - acknowledged
//! writes and geo-radius queries - behind a pluggable trait, with a mock
//! implementation for tests.

mod mock;

pub use mock::MockRecordStore;

use async_trait::async_trait;
use thiserror::Error;

use nearcast_types::{GeoPoint, Post, PostDraft, PostId, Radius};

/// Record store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write was rejected or lost.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// A query failed.
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// The store could not be reached at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// A remote, queryable, append-only collection of posts.
///
/// A geo-radius predicate is the only query shape the feed needs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a draft. The store acknowledges the draft's id on success.
    async fn write(&self, draft: &PostDraft) -> Result<PostId, StoreError>;

    /// Return all posts within `radius` of `center`.
    async fn query(&self, center: GeoPoint, radius: Radius) -> Result<Vec<Post>, StoreError>;
}
