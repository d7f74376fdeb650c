//! FeedSynchronizer - the owner of the local feed view.
//!
//! This module provides [`FeedSynchronizer`], the single logical owner of the
//! feed and marker state. It interprets the actions produced by the pure
//! [`SyncState`] scheduler in `nearcast-core` and performs the actual I/O
//! against the injected [`RecordStore`] and [`LocationSource`].
//!
//! Feed snapshots are published through a `tokio::sync::watch` channel, so
//! the presentation layer always observes either the old complete snapshot or
//! the new complete snapshot, never a mix. Errors cross the synchronization
//! boundary as [`FeedStatus`] values on a broadcast channel, never as panics.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{broadcast, watch, Mutex};

use nearcast_core::{
    build_snapshot, normalize_message, should_replace, unwrap_legacy_text, Delivery, FeedEntry,
    FeedSnapshot, SyncAction, SyncInput, SyncState,
};
use nearcast_types::{AuthorId, FeedError, Post, PostDraft, PostId, Radius};

use crate::location::LocationSource;
use crate::store::RecordStore;

/// Configuration for [`FeedSynchronizer`].
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Query radius around the device position. Meters; defaults to 1 km.
    pub radius: Radius,
    /// Cadence of the polling loop. Defaults to 3 seconds.
    pub poll_interval: Duration,
}

impl FeedConfig {
    /// Default polling cadence.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the query radius.
    pub fn with_radius(mut self, radius: Radius) -> Self {
        self.radius = radius;
        self
    }

    /// Set the polling cadence.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            radius: Radius::DEFAULT,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Status notifications for the presentation layer.
#[derive(Debug, Clone)]
pub enum FeedStatus {
    /// A synchronization cycle completed; the feed holds `post_count` entries.
    Synchronized {
        /// Entries in the feed after the cycle.
        post_count: usize,
    },
    /// Synchronization was deferred until a location sample arrives.
    SyncDeferred,
    /// A query failed; the feed is unchanged and the next cycle retries.
    SyncFailed {
        /// What went wrong.
        error: FeedError,
    },
    /// A post write was acknowledged.
    Posted {
        /// The acknowledged post.
        id: PostId,
    },
    /// A post write failed. The optimistic entry stays, marked failed,
    /// until the next successful cycle rebuilds the feed.
    PostFailed {
        /// The affected post.
        id: PostId,
        /// What went wrong.
        error: FeedError,
    },
}

/// Capacity of the status broadcast channel.
const STATUS_CHANNEL_CAPACITY: usize = 64;

/// The proximity feed synchronizer.
///
/// Owns the local feed and marker state; all mutation flows through the
/// synchronization and submission paths on this single logical owner.
pub struct FeedSynchronizer<S: RecordStore, L: LocationSource> {
    config: FeedConfig,
    store: S,
    location: L,
    author_id: AuthorId,
    state: Mutex<SyncState>,
    // Serializes every borrow-modify-replace of the snapshot channel, so the
    // submission and query paths never overwrite each other's update. Never
    // held across a store await.
    feed_lock: Mutex<()>,
    snapshot_tx: watch::Sender<FeedSnapshot>,
    status_tx: broadcast::Sender<FeedStatus>,
    synced_once: AtomicBool,
}

impl<S: RecordStore, L: LocationSource> FeedSynchronizer<S, L> {
    /// Create a new synchronizer.
    pub fn new(config: FeedConfig, store: S, location: L, author_id: AuthorId) -> Self {
        let (snapshot_tx, _) = watch::channel(FeedSnapshot::empty());
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            config,
            store,
            location,
            author_id,
            state: Mutex::new(SyncState::new()),
            feed_lock: Mutex::new(()),
            snapshot_tx,
            status_tx,
            synced_once: AtomicBool::new(false),
        }
    }

    /// The current feed snapshot.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to feed snapshots. Each received value is a complete,
    /// consistent snapshot.
    pub fn subscribe_feed(&self) -> watch::Receiver<FeedSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Subscribe to status notifications.
    pub fn subscribe_status(&self) -> broadcast::Receiver<FeedStatus> {
        self.status_tx.subscribe()
    }

    /// Whether at least one synchronization cycle has completed successfully.
    pub fn has_synchronized_once(&self) -> bool {
        self.synced_once.load(Ordering::Relaxed)
    }

    /// The local author identity.
    pub fn author_id(&self) -> AuthorId {
        self.author_id
    }

    /// Submit a message to the feed.
    ///
    /// The post is appended optimistically (marked [`Delivery::Pending`])
    /// before the write completes. On acknowledgment the entry is confirmed
    /// and a reconciliation cycle runs; on failure the entry stays in the
    /// feed marked [`Delivery::Failed`] until the next successful cycle
    /// rebuilds the feed, and the error is returned.
    pub async fn submit_post(&self, text: &str) -> Result<PostId, FeedError> {
        let text = normalize_message(text).ok_or(FeedError::EmptyText)?;
        let sample = self
            .location
            .current()
            .ok_or(FeedError::LocationUnavailable)?;

        let draft = PostDraft::new(text, self.author_id, sample.point);
        let id = draft.id;

        // Optimistic append; the feed stays sorted
        let entry = FeedEntry {
            post: draft.clone().into_post(),
            is_own: true,
            delivery: Delivery::Pending,
        };
        self.mutate_snapshot(|snapshot| snapshot.with_inserted(entry))
            .await;

        match self.store.write(&draft).await {
            Ok(acked) => {
                tracing::debug!("post {} acknowledged by store", acked);
                self.mutate_snapshot(|s| s.with_delivery(id, Delivery::Confirmed))
                    .await;
                let _ = self.status_tx.send(FeedStatus::Posted { id });
                // Reconcile optimistic local state with the store
                self.drive(SyncInput::SubmitAcknowledged).await;
                Ok(id)
            }
            Err(err) => {
                tracing::warn!("post {} write failed: {}", id, err);
                self.mutate_snapshot(|s| s.with_delivery(id, Delivery::Failed))
                    .await;
                let error = FeedError::StoreWriteFailed(err.to_string());
                let _ = self.status_tx.send(FeedStatus::PostFailed {
                    id,
                    error: error.clone(),
                });
                Err(error)
            }
        }
    }

    /// Request a synchronization cycle.
    ///
    /// Deferred (with a [`FeedStatus::SyncDeferred`] notification) when no
    /// location sample is known; coalesced when a cycle is already in
    /// flight. Query failures are reported on the status channel, never
    /// returned from here.
    pub async fn synchronize(&self) {
        self.drive(SyncInput::SyncRequested).await;
    }

    /// The polling loop: a periodic tick, a location-subscription wait, and
    /// a shutdown signal. Runs until `shutdown` turns true or its sender is
    /// dropped.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "feed poll loop started (radius {}, every {:?})",
            self.config.radius,
            self.config.poll_interval
        );

        let mut location_rx = self.location.subscribe();
        let mut location_open = true;
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.drive(SyncInput::Tick).await;
                }
                changed = location_rx.changed(), if location_open => {
                    match changed {
                        Ok(()) => {
                            let input = if location_rx.borrow_and_update().is_some() {
                                SyncInput::LocationAvailable
                            } else {
                                SyncInput::LocationLost
                            };
                            self.drive(input).await;
                        }
                        Err(_) => {
                            tracing::warn!("location source closed");
                            location_open = false;
                            self.drive(SyncInput::LocationLost).await;
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        tracing::info!("feed poll loop stopped");
                        return;
                    }
                }
            }
        }
    }

    /// Feed `input` into the scheduler and execute the resulting actions.
    async fn drive(&self, input: SyncInput) {
        let mut queue: VecDeque<SyncAction> = VecDeque::new();
        {
            let mut state = self.state.lock().await;
            // Reconcile the scheduler with the source before stepping, so a
            // fix gained or lost outside the run loop is still honored.
            let fix = self.location.current().is_some();
            if state.awaiting_location() && fix {
                let (next, actions) = (*state).on_input(SyncInput::LocationAvailable);
                *state = next;
                queue.extend(actions);
            } else if !state.awaiting_location() && !fix {
                let (next, actions) = (*state).on_input(SyncInput::LocationLost);
                *state = next;
                queue.extend(actions);
            }
            let (next, actions) = (*state).on_input(input);
            *state = next;
            queue.extend(actions);
        }

        while let Some(action) = queue.pop_front() {
            match action {
                SyncAction::EmitDeferred => {
                    tracing::debug!("synchronization deferred until a location sample arrives");
                    let _ = self.status_tx.send(FeedStatus::SyncDeferred);
                }
                SyncAction::StartQuery => {
                    self.run_query().await;
                    let mut state = self.state.lock().await;
                    let (next, actions) = (*state).on_input(SyncInput::QueryFinished);
                    *state = next;
                    queue.extend(actions);
                }
            }
        }
    }

    /// One query cycle. Never holds a lock across the store await.
    async fn run_query(&self) {
        let Some(sample) = self.location.current() else {
            // Fix lost between scheduling and execution
            tracing::debug!("location fix lost before query; cycle skipped");
            return;
        };

        match self.store.query(sample.point, self.config.radius).await {
            Ok(posts) => {
                let posts: Vec<Post> = posts.into_iter().map(untag).collect();
                {
                    let _feed = self.feed_lock.lock().await;
                    let current = self.snapshot_tx.borrow().clone();
                    if should_replace(&current, &posts) {
                        let snapshot = build_snapshot(posts, &self.author_id);
                        tracing::debug!("feed snapshot replaced ({} entries)", snapshot.len());
                        self.snapshot_tx.send_replace(snapshot);
                    } else {
                        tracing::debug!("result set unchanged; keeping current snapshot");
                    }
                }
                self.synced_once.store(true, Ordering::Relaxed);
                let post_count = self.snapshot_tx.borrow().len();
                let _ = self.status_tx.send(FeedStatus::Synchronized { post_count });
            }
            Err(err) => {
                tracing::warn!("feed query failed: {}", err);
                let _ = self.status_tx.send(FeedStatus::SyncFailed {
                    error: FeedError::StoreQueryFailed(err.to_string()),
                });
            }
        }
    }

    /// Publish a snapshot derived from the current one, atomically.
    async fn mutate_snapshot<F>(&self, update: F)
    where
        F: FnOnce(&FeedSnapshot) -> FeedSnapshot,
    {
        let _feed = self.feed_lock.lock().await;
        let next = update(&*self.snapshot_tx.borrow());
        self.snapshot_tx.send_replace(next);
    }
}

/// Strip the legacy display wrapper off fetched record text.
fn untag(mut post: Post) -> Post {
    let body = unwrap_legacy_text(&post.text);
    if body.len() != post.text.len() {
        post.text = body.to_string();
    }
    post
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::MockLocationSource;
    use crate::store::MockRecordStore;
    use chrono::{TimeZone, Utc};
    use nearcast_types::GeoPoint;
    use std::sync::Arc;

    fn here() -> GeoPoint {
        GeoPoint::new(37.789467, -122.416772).unwrap()
    }

    fn post_at(text: &str, author: AuthorId, secs: i64) -> Post {
        let mut post = PostDraft::new(text.into(), author, here()).into_post();
        post.timestamp = Utc.timestamp_opt(secs, 0).unwrap();
        post
    }

    fn feed_with_location(
        store: &MockRecordStore,
        author: AuthorId,
    ) -> FeedSynchronizer<MockRecordStore, MockLocationSource> {
        FeedSynchronizer::new(
            FeedConfig::default(),
            store.clone(),
            MockLocationSource::at(here()),
            author,
        )
    }

    // ===========================================
    // Configuration Tests
    // ===========================================

    #[test]
    fn config_defaults() {
        let config = FeedConfig::default();
        assert_eq!(config.radius.meters(), 1000.0);
        assert_eq!(config.poll_interval, Duration::from_secs(3));
    }

    #[test]
    fn config_builder_pattern() {
        let config = FeedConfig::new()
            .with_radius(Radius::from_km(5.0).unwrap())
            .with_poll_interval(Duration::from_secs(10));

        assert_eq!(config.radius.km(), 5.0);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
    }

    // ===========================================
    // Submission Tests
    // ===========================================

    #[tokio::test]
    async fn empty_text_rejected_without_store_contact() {
        let store = MockRecordStore::new();
        let feed = feed_with_location(&store, AuthorId::random());

        let result = feed.submit_post("   ").await;

        assert!(matches!(result, Err(FeedError::EmptyText)));
        assert_eq!(store.write_count(), 0);
        assert_eq!(store.query_count(), 0);
        assert!(feed.snapshot().is_empty());
    }

    #[tokio::test]
    async fn submit_without_location_rejected() {
        let store = MockRecordStore::new();
        let feed = FeedSynchronizer::new(
            FeedConfig::default(),
            store.clone(),
            MockLocationSource::new(),
            AuthorId::random(),
        );

        let result = feed.submit_post("hello").await;

        assert!(matches!(result, Err(FeedError::LocationUnavailable)));
        assert_eq!(store.write_count(), 0);
        assert!(feed.snapshot().is_empty());
    }

    #[tokio::test]
    async fn submit_trims_text_before_write() {
        let store = MockRecordStore::new();
        let feed = feed_with_location(&store, AuthorId::random());

        feed.submit_post("  hello  ").await.unwrap();

        assert_eq!(store.written_posts()[0].text, "hello");
    }

    #[tokio::test]
    async fn submit_writes_location_and_author() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        let feed = feed_with_location(&store, author);

        feed.submit_post("hello").await.unwrap();

        let written = store.written_posts();
        assert_eq!(written[0].location, here());
        assert_eq!(written[0].author_id, author);
    }

    #[tokio::test]
    async fn acknowledged_submit_reconciles_without_duplication() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        let feed = feed_with_location(&store, author);

        let id = feed.submit_post("hello").await.unwrap();

        // One write, and the follow-up reconciliation cycle queried the store
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.query_count(), 1);

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.entries[0].post.id, id);
        assert!(snapshot.entries[0].is_own);
        assert_eq!(snapshot.entries[0].delivery, Delivery::Confirmed);
        assert_eq!(snapshot.markers.len(), 1);
    }

    #[tokio::test]
    async fn failed_write_keeps_entry_marked_failed() {
        let store = MockRecordStore::new();
        let feed = feed_with_location(&store, AuthorId::random());
        let mut status = feed.subscribe_status();
        store.fail_next_write("quota exceeded");

        let result = feed.submit_post("hello").await;

        assert!(matches!(result, Err(FeedError::StoreWriteFailed(_))));
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 1, "optimistic entry stands");
        assert_eq!(snapshot.entries[0].delivery, Delivery::Failed);
        assert!(matches!(
            status.try_recv(),
            Ok(FeedStatus::PostFailed { .. })
        ));
    }

    #[tokio::test]
    async fn failed_entry_lives_until_next_successful_cycle() {
        let store = MockRecordStore::new();
        let feed = feed_with_location(&store, AuthorId::random());
        store.fail_next_write("quota exceeded");

        let _ = feed.submit_post("lost").await;
        assert_eq!(feed.snapshot().entries[0].delivery, Delivery::Failed);

        // The wholesale rebuild carries only what the store returns
        feed.synchronize().await;
        assert!(feed.snapshot().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn concurrent_failed_submits_keep_every_entry() {
        let store = MockRecordStore::new();
        store.fail_all_writes("quota exceeded");
        let feed = Arc::new(feed_with_location(&store, AuthorId::random()));

        let mut handles = Vec::new();
        for i in 0..100 {
            let feed = Arc::clone(&feed);
            handles.push(tokio::spawn(async move {
                let _ = feed.submit_post(&format!("message {i}")).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // No interleaving of submission paths may drop an optimistic entry
        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 100);
        assert_eq!(snapshot.markers.len(), 100);
        assert!(snapshot
            .entries
            .iter()
            .all(|e| e.delivery == Delivery::Failed));
    }

    // ===========================================
    // Synchronization Tests
    // ===========================================

    #[tokio::test]
    async fn feed_sorted_ascending_by_timestamp() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        // Store returns [T2, T1, T3]
        store.seed_post(post_at("second", author, 200));
        store.seed_post(post_at("first", author, 100));
        store.seed_post(post_at("third", author, 300));
        let feed = feed_with_location(&store, author);

        feed.synchronize().await;

        let texts: Vec<String> = feed
            .snapshot()
            .entries
            .iter()
            .map(|e| e.post.text.clone())
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
        assert!(feed.has_synchronized_once());
    }

    #[tokio::test]
    async fn own_posts_tagged_against_local_identity() {
        let local = AuthorId::random();
        let other = AuthorId::random();
        let store = MockRecordStore::new();
        store.seed_post(post_at("mine", local, 100));
        store.seed_post(post_at("theirs", other, 200));
        let feed = feed_with_location(&store, local);

        feed.synchronize().await;

        let snapshot = feed.snapshot();
        assert!(snapshot.entries[0].is_own);
        assert!(!snapshot.entries[1].is_own);
    }

    #[tokio::test]
    async fn repeated_synchronize_is_idempotent() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        store.seed_post(post_at("a", author, 100));
        let feed = feed_with_location(&store, author);

        feed.synchronize().await;
        let first = feed.snapshot();

        // Unchanged remote set: the snapshot is not even republished
        let mut rx = feed.subscribe_feed();
        rx.borrow_and_update();
        feed.synchronize().await;

        assert_eq!(feed.snapshot(), first);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn same_count_replacement_is_applied() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        store.seed_post(post_at("old", author, 100));
        let feed = feed_with_location(&store, author);
        feed.synchronize().await;

        // One post swapped for another: same count, different id
        store.set_records(vec![post_at("new", author, 200)]);
        feed.synchronize().await;

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.entries[0].post.text, "new");
    }

    #[tokio::test]
    async fn query_failure_leaves_feed_untouched_with_one_error_status() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        store.seed_post(post_at("a", author, 100));
        let feed = feed_with_location(&store, author);
        feed.synchronize().await;
        let before = feed.snapshot();

        let mut status = feed.subscribe_status();
        store.fail_next_query("network unreachable");
        feed.synchronize().await;

        assert_eq!(feed.snapshot(), before);
        assert!(matches!(
            status.try_recv(),
            Ok(FeedStatus::SyncFailed { .. })
        ));
        assert!(
            status.try_recv().is_err(),
            "exactly one error status expected"
        );
    }

    #[tokio::test]
    async fn synchronize_without_location_defers() {
        let store = MockRecordStore::new();
        let feed = FeedSynchronizer::new(
            FeedConfig::default(),
            store.clone(),
            MockLocationSource::new(),
            AuthorId::random(),
        );
        let mut status = feed.subscribe_status();

        feed.synchronize().await;

        assert_eq!(store.query_count(), 0);
        assert!(matches!(status.try_recv(), Ok(FeedStatus::SyncDeferred)));
        assert!(!feed.has_synchronized_once());
    }

    #[tokio::test]
    async fn legacy_wrapped_text_is_unwrapped_on_fetch() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        store.seed_post(post_at("text(\"old message\")", author, 100));
        store.seed_post(post_at("meet at the park (north gate)", author, 200));
        let feed = feed_with_location(&store, author);

        feed.synchronize().await;

        let snapshot = feed.snapshot();
        assert_eq!(snapshot.entries[0].post.text, "old message");
        assert_eq!(
            snapshot.entries[1].post.text,
            "meet at the park (north gate)"
        );
    }

    #[tokio::test]
    async fn status_reports_post_count() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        store.seed_post(post_at("a", author, 100));
        store.seed_post(post_at("b", author, 200));
        let feed = feed_with_location(&store, author);
        let mut status = feed.subscribe_status();

        feed.synchronize().await;

        assert!(matches!(
            status.try_recv(),
            Ok(FeedStatus::Synchronized { post_count: 2 })
        ));
    }

    // ===========================================
    // Poll Loop Tests
    // ===========================================

    async fn wait_until(mut condition: impl FnMut() -> bool) {
        for _ in 0..200 {
            if condition() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        panic!("condition not met in time");
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_defers_until_location_arrives() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        store.seed_post(post_at("nearby", author, 100));
        let location = MockLocationSource::new();
        let feed = Arc::new(FeedSynchronizer::new(
            FeedConfig::default(),
            store.clone(),
            location.clone(),
            author,
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn({
            let feed = Arc::clone(&feed);
            async move { feed.run(shutdown_rx).await }
        });

        // Several ticks pass with no fix: every cycle is deferred
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.query_count(), 0);

        // The first sample wakes the loop and runs the deferred cycle
        location.set_point(here());
        let store_probe = store.clone();
        wait_until(move || store_probe.query_count() > 0).await;

        let feed_probe = Arc::clone(&feed);
        wait_until(move || feed_probe.has_synchronized_once()).await;
        assert_eq!(feed.snapshot().len(), 1);

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_resynchronizes_on_tick() {
        let author = AuthorId::random();
        let store = MockRecordStore::new();
        let location = MockLocationSource::at(here());
        let feed = Arc::new(FeedSynchronizer::new(
            FeedConfig::default(),
            store.clone(),
            location,
            author,
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn({
            let feed = Arc::clone(&feed);
            async move { feed.run(shutdown_rx).await }
        });

        let store_probe = store.clone();
        wait_until(move || store_probe.query_count() >= 1).await;

        // A post appears remotely; a later tick picks it up
        store.seed_post(post_at("new", author, 100));
        let feed_probe = Arc::clone(&feed);
        wait_until(move || feed_probe.snapshot().len() == 1).await;

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn poll_loop_stops_on_shutdown() {
        let feed = Arc::new(FeedSynchronizer::new(
            FeedConfig::default(),
            MockRecordStore::new(),
            MockLocationSource::new(),
            AuthorId::random(),
        ));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn({
            let feed = Arc::clone(&feed);
            async move { feed.run(shutdown_rx).await }
        });

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
