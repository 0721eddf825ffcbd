//! Single-flight guard for site regeneration.
//!
//! The guard is a two-state machine, `Idle` and `Rebuilding`. A change event
//! arriving while a rebuild is in flight is dropped rather than queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Current state of the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RebuildState {
    Idle,
    Rebuilding,
}

/// Ensures at most one rebuild runs at a time.
#[derive(Debug, Default)]
pub struct RebuildGuard {
    rebuilding: AtomicBool,
}

impl RebuildGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transition `Idle → Rebuilding`.
    ///
    /// Returns `None` when a rebuild is already running. The returned ticket moves
    /// the guard back to `Idle` when dropped, whether the rebuild succeeded or not.
    pub fn try_begin(self: &Arc<Self>) -> Option<RebuildTicket> {
        self.rebuilding
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RebuildTicket {
                guard: Arc::clone(self),
            })
    }

    pub fn state(&self) -> RebuildState {
        if self.rebuilding.load(Ordering::Acquire) {
            RebuildState::Rebuilding
        } else {
            RebuildState::Idle
        }
    }
}

/// Proof that the holder owns the current rebuild.
#[derive(Debug)]
pub struct RebuildTicket {
    guard: Arc<RebuildGuard>,
}

impl Drop for RebuildTicket {
    fn drop(&mut self) {
        self.guard.rebuilding.store(false, Ordering::Release);
    }
}
