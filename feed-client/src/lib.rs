//! # nearcast-client
//!
//! The proximity feed synchronizer for nearcast.
//!
//! This crate provides [`FeedSynchronizer`], the owner of the local feed
//! view: on a timer and after each acknowledged post, it issues a
//! radius-bounded query against a remote record store, rebuilds the feed and
//! marker snapshot, and publishes it to the presentation layer.
//!
//! # Architecture
//!
//! ```text
//! Presentation → FeedSynchronizer → RecordStore  → remote store
//!                      ↓          ↘ LocationSource → platform location
//!                nearcast-core (pure snapshot + scheduling logic)
//! ```
//!
//! The synchronizer performs the I/O; all merge, sort, change-detection, and
//! cycle-scheduling decisions are made by pure functions in `nearcast-core`.
//!
//! # Example
//!
//! ```ignore
//! use nearcast_client::{FeedConfig, FeedSynchronizer, MockLocationSource, MockRecordStore};
//! use nearcast_types::{AuthorId, GeoPoint};
//!
//! let store = MockRecordStore::new();
//! let location = MockLocationSource::at(GeoPoint::new(37.7749, -122.4194).unwrap());
//! let feed = FeedSynchronizer::new(FeedConfig::default(), store, location, AuthorId::random());
//!
//! let mut snapshots = feed.subscribe_feed();
//! feed.submit_post("anyone near the park?").await?;
//! feed.synchronize().await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod identity;
mod location;
mod store;
mod synchronizer;

pub use identity::{IdentityError, InstallationIdentity};
pub use location::{LocationSource, MockLocationSource};
pub use store::{MockRecordStore, RecordStore, StoreError};
pub use synchronizer::{FeedConfig, FeedStatus, FeedSynchronizer};
