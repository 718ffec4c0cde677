// SPDX-License-Identifier: MIT

//! The top-level error composed from every stage's own taxonomy, matching
//! the teacher's `LifecycleError`/`RuntimeError`/`WalError` layering —
//! one enum per crate, `#[from]`-composed at the daemon boundary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    /// DirLister hit a fatal directory-read failure (spec.md §4.1).
    #[error("dirlister: {0}")]
    Listen(#[from] pmjq_listener::ListenError),

    /// Locker hit a fatal lock I/O failure other than contention
    /// (spec.md §4.2 "Failure modes").
    #[error("locker: {0}")]
    Lock(#[from] pmjq_locker::LockError),

    /// A worker's command failed with no `--error=` templates configured
    /// — spec.md §4.4's intentional "no safety net" abort.
    #[error("{0}")]
    WorkerFatal(String),

    /// A pipeline stage task panicked rather than returning an error.
    #[error("pipeline task panicked: {0}")]
    TaskPanicked(String),

    #[error("failed to set up logging: {0}")]
    Logging(#[source] std::io::Error),
}
