//! Error types for the nearcast feed.

use thiserror::Error;

/// Errors that can occur in feed operations.
///
/// None of these is fatal: every variant is recoverable by waiting for the
/// next trigger (timer tick, new location sample, or user retry). Values
/// cross the synchronization boundary as status notifications, so the type
/// is `Clone`.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// Message text was empty after trimming.
    #[error("message text is empty")]
    EmptyText,

    /// No location sample is known yet. Location-dependent work is deferred,
    /// not failed.
    #[error("device location not yet available")]
    LocationUnavailable,

    /// A coordinate was out of range.
    #[error("invalid coordinate: ({latitude}, {longitude})")]
    InvalidCoordinate {
        /// Offending latitude in degrees.
        latitude: f64,
        /// Offending longitude in degrees.
        longitude: f64,
    },

    /// A query radius was non-positive or over the cap.
    #[error("invalid radius: {0} meters")]
    InvalidRadius(f64),

    /// The record store rejected or failed a write. The optimistic local
    /// entry stands, marked as failed.
    #[error("store write failed: {0}")]
    StoreWriteFailed(String),

    /// A feed query failed. Local state is unchanged; the next cycle retries.
    #[error("store query failed: {0}")]
    StoreQueryFailed(String),
}
