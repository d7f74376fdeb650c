//! Synchronization-cycle state machine.
//!
//! This module provides a pure, side-effect-free state machine for scheduling
//! feed synchronization cycles. The machine takes inputs (timer ticks, sync
//! requests, location availability) and produces a new state plus actions to
//! execute.
//!
//! The actual I/O (queries, channel sends) is performed by nearcast-client,
//! not by this module. The machine encodes two rules the feed depends on:
//!
//! - Work that needs a location is **deferred** while none is known, and runs
//!   as soon as the first sample arrives. Callers never poll or spin.
//! - Cycles are mutually exclusive. A tick or request that lands while a query
//!   is in flight coalesces into at most one follow-up query, so concurrent
//!   cycles never race each other over the feed state.

/// Cycle scheduling state - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No location sample is known yet.
    AwaitingLocation {
        /// Whether a sync was requested while waiting; the first sample
        /// starts a query immediately.
        sync_pending: bool,
    },
    /// Location known, no query in flight.
    Idle,
    /// A query is in flight.
    Syncing {
        /// Whether another sync was requested meanwhile. At most one
        /// follow-up query runs when the in-flight one finishes.
        rerun_pending: bool,
    },
}

/// Inputs to the cycle scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncInput {
    /// The location source produced its first (or a new) sample.
    LocationAvailable,
    /// The location source lost its fix.
    LocationLost,
    /// The periodic timer fired.
    Tick,
    /// A caller asked for a synchronization cycle.
    SyncRequested,
    /// A post write was acknowledged; the feed should reconcile.
    SubmitAcknowledged,
    /// The in-flight query finished (success or failure).
    QueryFinished,
}

/// Actions to be executed by nearcast-client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Issue a radius query against the record store.
    StartQuery,
    /// Report that work was deferred for lack of a location sample.
    EmitDeferred,
}

impl SyncState {
    /// Create a new machine. No location is known at first.
    pub fn new() -> Self {
        Self::AwaitingLocation {
            sync_pending: false,
        }
    }

    /// Process an input and return the new state plus actions to execute.
    ///
    /// This is a pure function - no side effects. The caller is responsible
    /// for executing the returned actions.
    pub fn on_input(self, input: SyncInput) -> (Self, Vec<SyncAction>) {
        use SyncInput::*;

        match (self, input) {
            // Waiting for the first sample: remember requests, never fail them
            (Self::AwaitingLocation { .. }, Tick | SyncRequested | SubmitAcknowledged) => (
                Self::AwaitingLocation { sync_pending: true },
                vec![SyncAction::EmitDeferred],
            ),
            (Self::AwaitingLocation { sync_pending: true }, LocationAvailable) => (
                Self::Syncing {
                    rerun_pending: false,
                },
                vec![SyncAction::StartQuery],
            ),
            (
                Self::AwaitingLocation {
                    sync_pending: false,
                },
                LocationAvailable,
            ) => (Self::Idle, vec![]),

            // Idle: any trigger starts a cycle
            (Self::Idle, Tick | SyncRequested | SubmitAcknowledged) => (
                Self::Syncing {
                    rerun_pending: false,
                },
                vec![SyncAction::StartQuery],
            ),
            (Self::Idle, LocationLost) => (
                Self::AwaitingLocation {
                    sync_pending: false,
                },
                vec![],
            ),

            // In flight: triggers coalesce into one pending re-run
            (Self::Syncing { .. }, Tick | SyncRequested | SubmitAcknowledged) => (
                Self::Syncing { rerun_pending: true },
                vec![],
            ),
            (Self::Syncing { rerun_pending: true }, QueryFinished) => (
                Self::Syncing {
                    rerun_pending: false,
                },
                vec![SyncAction::StartQuery],
            ),
            (
                Self::Syncing {
                    rerun_pending: false,
                },
                QueryFinished,
            ) => (Self::Idle, vec![]),
            (Self::Syncing { rerun_pending }, LocationLost) => (
                // The in-flight result still applies; the pending re-run
                // waits for the next sample.
                Self::AwaitingLocation {
                    sync_pending: rerun_pending,
                },
                vec![],
            ),

            // A query finishing while we lost location mid-flight, repeated
            // location updates, and other no-ops: stay put
            (state, _) => (state, vec![]),
        }
    }

    /// Check whether a query is in flight.
    pub fn is_syncing(&self) -> bool {
        matches!(self, Self::Syncing { .. })
    }

    /// Check whether the machine is waiting for a location sample.
    pub fn awaiting_location(&self) -> bool {
        matches!(self, Self::AwaitingLocation { .. })
    }
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}
