//! # nearcast-types
//!
//! Record and geographic types for the nearcast proximity feed.
//!
//! This crate provides the foundational types used across all nearcast crates:
//! - [`PostId`], [`AuthorId`] - Identity types
//! - [`GeoPoint`], [`Radius`], [`Viewport`], [`LocationSample`] - Geographic types
//! - [`Post`], [`PostDraft`] - Persisted records
//! - [`FeedError`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

mod error;
mod geo;
mod ids;
mod post;

pub use error::FeedError;
pub use geo::{GeoPoint, LocationSample, Radius, Viewport};
pub use ids::{AuthorId, PostId};
pub use post::{Post, PostDraft};
