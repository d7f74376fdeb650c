//! # nearcast-core
//!
//! Pure logic for the nearcast feed (no I/O, instant tests).
//!
//! This crate implements the snapshot construction, change detection, and
//! cycle scheduling for the proximity feed without any network or disk I/O.
//!
//! ## Design Philosophy
//!
//! All modules in this crate are **pure** - they take input and produce output
//! without side effects. This enables:
//! - Instant unit tests (no mocks, no async)
//! - Deterministic behavior (same input → same output)
//! - Easy reasoning about state transitions
//!
//! The actual I/O (record store, location services) is performed by
//! `nearcast-client`, which interprets the actions produced by the
//! [`SyncState`] machine and publishes the snapshots built here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod feed;
pub mod state;
pub mod text;

pub use feed::{build_snapshot, should_replace, Delivery, FeedEntry, FeedSnapshot, MapMarker};
pub use state::{SyncAction, SyncInput, SyncState};
pub use text::{normalize_message, unwrap_legacy_text};
