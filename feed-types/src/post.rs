//! Persisted post records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AuthorId, GeoPoint, PostId};

/// A message persisted in the record store.
///
/// Posts are append-only: once written they are never mutated or deleted by
/// this library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Record identity.
    pub id: PostId,
    /// The message body. Non-empty after trimming.
    pub text: String,
    /// The installation that authored the post.
    pub author_id: AuthorId,
    /// Where the post was written.
    pub location: GeoPoint,
    /// When the post was written.
    pub timestamp: DateTime<Utc>,
}

/// A post awaiting write acknowledgment.
///
/// Carries the same fields as [`Post`]; the id is generated by the submitting
/// client so the record can be matched against the optimistic feed entry once
/// the store acknowledges it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDraft {
    /// Client-generated record identity.
    pub id: PostId,
    /// The normalized message body.
    pub text: String,
    /// The submitting installation.
    pub author_id: AuthorId,
    /// Last known device location at submit time.
    pub location: GeoPoint,
    /// Submit time.
    pub timestamp: DateTime<Utc>,
}

impl PostDraft {
    /// Create a draft for `text` authored by `author_id` at `location`,
    /// timestamped now.
    pub fn new(text: String, author_id: AuthorId, location: GeoPoint) -> Self {
        Self {
            id: PostId::new(),
            text,
            author_id,
            location,
            timestamp: Utc::now(),
        }
    }

    /// Convert into the persisted record form.
    pub fn into_post(self) -> Post {
        Post {
            id: self.id,
            text: self.text,
            author_id: self.author_id,
            location: self.location,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn somewhere() -> GeoPoint {
        GeoPoint::new(37.789467, -122.416772).unwrap()
    }

    #[test]
    fn draft_assigns_fresh_id() {
        let author = AuthorId::random();
        let a = PostDraft::new("one".into(), author, somewhere());
        let b = PostDraft::new("two".into(), author, somewhere());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn draft_into_post_preserves_fields() {
        let author = AuthorId::random();
        let draft = PostDraft::new("hello".into(), author, somewhere());
        let id = draft.id;
        let ts = draft.timestamp;

        let post = draft.into_post();
        assert_eq!(post.id, id);
        assert_eq!(post.text, "hello");
        assert_eq!(post.author_id, author);
        assert_eq!(post.location, somewhere());
        assert_eq!(post.timestamp, ts);
    }

    #[test]
    fn post_serde_roundtrip() {
        let post = PostDraft::new("hi".into(), AuthorId::random(), somewhere()).into_post();
        let json = serde_json::to_string(&post).unwrap();
        let back: Post = serde_json::from_str(&json).unwrap();
        assert_eq!(post, back);
    }
}
