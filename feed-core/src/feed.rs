//! Feed snapshot construction and change detection.
//!
//! A snapshot is the complete local view of the feed: the time-ordered entry
//! sequence plus the map marker set. Snapshots are rebuilt wholesale from each
//! successful query and replaced atomically; no entry survives a refresh as
//! the same object, only as equivalent data.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use nearcast_types::{AuthorId, GeoPoint, Post, PostId};

/// Delivery state of a feed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Delivery {
    /// Written optimistically; the store has not acknowledged it yet.
    Pending,
    /// Acknowledged by the store (or fetched from it).
    Confirmed,
    /// The store rejected the write. The entry stays in the feed, flagged,
    /// until the next successful cycle's wholesale rebuild replaces the feed
    /// with what the store returns.
    Failed,
}

/// A display-ready feed entry derived from a [`Post`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// The underlying record.
    pub post: Post,
    /// Whether the post was authored by this installation.
    pub is_own: bool,
    /// Delivery state. Fetched entries are always `Confirmed`.
    pub delivery: Delivery,
}

/// A map pin derived from a post. Regenerated wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    /// Pin coordinate.
    pub location: GeoPoint,
    /// Display label, the post text truncated to [`MapMarker::MAX_LABEL`] chars.
    pub label: String,
}

impl MapMarker {
    /// Longest marker label, in characters.
    pub const MAX_LABEL: usize = 40;

    /// Derive a marker from a post.
    pub fn for_post(post: &Post) -> Self {
        Self {
            location: post.location,
            label: post.text.chars().take(Self::MAX_LABEL).collect(),
        }
    }
}

/// The complete local feed view: entries sorted ascending by timestamp plus
/// one marker per entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeedSnapshot {
    /// Feed entries, always sorted ascending by `post.timestamp`.
    pub entries: Vec<FeedEntry>,
    /// One marker per entry, in the same order.
    pub markers: Vec<MapMarker>,
}

impl FeedSnapshot {
    /// An empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the feed has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return a copy with `entry` inserted at its timestamp position.
    ///
    /// Used for the optimistic local append: the entry lands where the sort
    /// invariant puts it, after any existing entry with the same timestamp.
    pub fn with_inserted(&self, entry: FeedEntry) -> Self {
        let mut next = self.clone();
        let at = next
            .entries
            .partition_point(|e| e.post.timestamp <= entry.post.timestamp);
        next.markers.insert(at, MapMarker::for_post(&entry.post));
        next.entries.insert(at, entry);
        next
    }

    /// Return a copy with the delivery state of the entry for `id` updated.
    /// Unchanged if no entry matches.
    pub fn with_delivery(&self, id: PostId, delivery: Delivery) -> Self {
        let mut next = self.clone();
        if let Some(entry) = next.entries.iter_mut().find(|e| e.post.id == id) {
            entry.delivery = delivery;
        }
        next
    }
}

/// Build a snapshot from a query result.
///
/// Entries are tagged `is_own` by comparing authors against `local_author`,
/// stable-sorted ascending by timestamp (ties keep the store's return order),
/// and marked `Confirmed`. One marker is derived per post.
pub fn build_snapshot(posts: Vec<Post>, local_author: &AuthorId) -> FeedSnapshot {
    let mut entries: Vec<FeedEntry> = posts
        .into_iter()
        .map(|post| FeedEntry {
            is_own: post.author_id == *local_author,
            delivery: Delivery::Confirmed,
            post,
        })
        .collect();
    entries.sort_by_key(|e| e.post.timestamp);

    let markers = entries.iter().map(|e| MapMarker::for_post(&e.post)).collect();

    FeedSnapshot { entries, markers }
}

/// Decide whether a query result should replace the current snapshot.
///
/// The count-equality check is the cheap fast path the feed has always had;
/// the id-set comparison backs it up so a same-count replacement (one post
/// swapped for another) is still applied.
pub fn should_replace(current: &FeedSnapshot, incoming: &[Post]) -> bool {
    if current.len() != incoming.len() {
        return true;
    }
    let current_ids: HashSet<PostId> = current.entries.iter().map(|e| e.post.id).collect();
    incoming.iter().any(|p| !current_ids.contains(&p.id))
}
