//! Versioned single-writer/single-reader snapshot handoff.
//!
//! The control context builds a complete value off to the side and publishes
//! it in one atomic swap. The audio context loads the latest value without
//! locking or allocating and always sees either the previous or the new
//! snapshot in full.

use arc_swap::{ArcSwap, ArcSwapOption, Guard};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::trace;

/// Lock-free cell holding the latest published snapshot.
///
/// The snapshot replaced by a publish stays alive until the following
/// publish, so it is normally released on the writer's thread. A reader
/// holding a [`load`](Self::load) guard across two publishes owns the last
/// reference to the older snapshot and frees it when the guard drops.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    current: ArcSwap<T>,
    retired: ArcSwapOption<T>,
    version: AtomicU64,
}

impl<T> SnapshotCell<T> {
    /// Cell at version 0 holding `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            retired: ArcSwapOption::empty(),
            version: AtomicU64::new(0),
        }
    }

    /// Replace the snapshot and return its new version. Never blocks readers.
    pub fn publish(&self, value: T) -> u64 {
        let previous = self.current.swap(Arc::new(value));
        self.retired.store(Some(previous));
        let version = self.version.fetch_add(1, Ordering::AcqRel) + 1;
        trace!("Snapshot {} published", version);
        version
    }

    /// Latest snapshot. Lock-free, allocation-free.
    #[inline]
    pub fn load(&self) -> Guard<Arc<T>> {
        self.current.load()
    }

    /// Latest snapshot as an owned `Arc`, for control-side inspection.
    pub fn load_full(&self) -> Arc<T> {
        self.current.load_full()
    }

    /// Number of publishes so far.
    ///
    /// Bumped after the swap: a reader seeing version `n` also sees a
    /// snapshot at least as new as publish `n`.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}

impl<T: Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
