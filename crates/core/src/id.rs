// SPDX-License-Identifier: MIT

//! Transition ID minting.
//!
//! A `Transition` carries a monotonically increasing integer `id`, unique
//! within the daemon process, used only for diagnostic correlation in log
//! lines. Unlike the externally-visible IDs elsewhere in this workspace
//! (none, here — PMJQ has no persisted entities), this is a bare in-memory
//! counter: there is nothing to serialize or look up it by.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates unique `Transition` IDs for one daemon process.
///
/// Cheap to clone (wraps an `Arc<AtomicU64>`); share one instance across
/// every stage that mints transitions (today: only the seed, cloned by
/// `DirLister` on each candidate tuple).
#[derive(Clone, Debug, Default)]
pub struct TransitionIdGen {
    next: Arc<AtomicU64>,
}

impl TransitionIdGen {
    pub fn new() -> Self {
        Self {
            next: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Mint the next unique ID.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}
