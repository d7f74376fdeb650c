//! Location source abstraction.
//!
//! The platform location service is modeled as an explicit capability
//! injected into the synchronizer, never an ambient singleton. Consumers wait
//! for samples through a watch subscription; nothing in this crate polls or
//! spins for a fix.

use tokio::sync::watch;

use nearcast_types::{GeoPoint, LocationSample};

/// A source of device location samples.
pub trait LocationSource: Send + Sync {
    /// The last known sample, or `None` before the first fix.
    fn current(&self) -> Option<LocationSample>;

    /// Subscribe to sample updates. The receiver yields the current value
    /// first, then changes; `None` means the fix was lost.
    fn subscribe(&self) -> watch::Receiver<Option<LocationSample>>;
}

/// Scripted location source for tests and headless use.
///
/// Starts with no fix; drive it with [`set_point`](Self::set_point) /
/// [`clear`](Self::clear). Clones share state.
#[derive(Debug)]
pub struct MockLocationSource {
    tx: std::sync::Arc<watch::Sender<Option<LocationSample>>>,
}

impl MockLocationSource {
    /// Create a source with no fix yet.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    /// Create a source that already has a fix at `point`.
    pub fn at(point: GeoPoint) -> Self {
        let source = Self::new();
        source.set_point(point);
        source
    }

    /// Publish a full sample.
    pub fn set_sample(&self, sample: LocationSample) {
        self.tx.send_replace(Some(sample));
    }

    /// Publish a sample at `point`, observed now, with the default viewport.
    pub fn set_point(&self, point: GeoPoint) {
        self.set_sample(LocationSample::at(point));
    }

    /// Drop the fix.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

impl Default for MockLocationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MockLocationSource {
    fn clone(&self) -> Self {
        Self {
            tx: std::sync::Arc::clone(&self.tx),
        }
    }
}

impl LocationSource for MockLocationSource {
    fn current(&self) -> Option<LocationSample> {
        *self.tx.borrow()
    }

    fn subscribe(&self) -> watch::Receiver<Option<LocationSample>> {
        self.tx.subscribe()
    }
}
