// SPDX-License-Identifier: MIT

//! `Locker`: claims every lock a candidate Transition needs before
//! handing it on to the Spawner, per spec.md §4.2.

use crate::error::LockError;
use crate::lockfile::{self, LockOutcome, LockTiming};
use crate::sync::LockerHalf;
use pmjq_core::Transition;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use uuid::Uuid;

pub struct Locker {
    sync: LockerHalf,
    from_dirlister: mpsc::Receiver<Transition>,
    to_spawner: mpsc::Sender<Transition>,
    timing: LockTiming,
}

impl Locker {
    pub fn new(
        sync: LockerHalf,
        from_dirlister: mpsc::Receiver<Transition>,
        to_spawner: mpsc::Sender<Transition>,
    ) -> Self {
        Self::with_timing(sync, from_dirlister, to_spawner, LockTiming::default())
    }

    /// Same as [`Locker::new`], but with the refresh/staleness durations
    /// overridden — `pmjq-daemon::Config` uses this to thread
    /// `PMJQ_LOCK_REFRESH_MS`/`PMJQ_STALE_AFTER_MS` down to every
    /// `LockFile` task this `Locker` spawns.
    pub fn with_timing(
        sync: LockerHalf,
        from_dirlister: mpsc::Receiver<Transition>,
        to_spawner: mpsc::Sender<Transition>,
        timing: LockTiming,
    ) -> Self {
        Self {
            sync,
            from_dirlister,
            to_spawner,
            timing,
        }
    }

    /// Run until the upstream candidate channel or either handshake half
    /// closes, or a fatal lock I/O error occurs (spec.md §4.2 "Failure
    /// modes": anything but already-exists is fatal, the caller is
    /// expected to log it and abort the process).
    pub async fn run(mut self) -> Result<(), LockError> {
        loop {
            let Some(mut transition) = self.from_dirlister.recv().await else {
                return Ok(());
            };

            loop {
                let Some(slot) = self.sync.recv_reserved().await else {
                    return Ok(());
                };

                match Self::try_acquire(&transition, self.timing).await? {
                    Some(release_tx) => {
                        transition.lock_release = Some(release_tx);
                        transition.worker_id = Some(slot.0);
                        if self.to_spawner.send(transition).await.is_err() {
                            return Ok(());
                        }
                        break;
                    }
                    None => {
                        if self.sync.give_back(slot).await.is_err() {
                            return Ok(());
                        }
                        // Drop this transition; DirLister re-discovers it
                        // next tick if it's still there (spec.md §4.2
                        // steps 5/6, §7). Retrying the same transition
                        // here would busy-loop forever once a peer has
                        // consumed its input.
                        break;
                    }
                }
            }
        }
    }

    /// Attempt to claim every input and output lock concurrently,
    /// re-verify the inputs are still present, and return a release
    /// handle on success. On contention or a vanished input every
    /// acquired lock is released and `None` is returned (spec.md §4.2
    /// steps 3-6); a fatal I/O error releases what it can and propagates.
    async fn try_acquire(
        transition: &Transition,
        timing: LockTiming,
    ) -> Result<Option<mpsc::Sender<()>>, LockError> {
        let paths: Vec<PathBuf> = transition.lockable_paths().cloned().collect();
        let n = paths.len().max(1);

        let (release_tx, release_rx) = mpsc::channel::<()>(n);
        let shared_release_rx = Arc::new(Mutex::new(release_rx));
        let (result_tx, mut result_rx) = mpsc::channel(n);
        let nonce = Uuid::new_v4();

        for path in &paths {
            lockfile::spawn_with_timing(
                path.clone(),
                nonce,
                result_tx.clone(),
                shared_release_rx.clone(),
                timing,
            );
        }
        drop(result_tx);

        let mut all_ok = true;
        let mut fatal = None;
        for _ in 0..paths.len() {
            match result_rx.recv().await {
                Some(LockOutcome::Acquired) => {}
                Some(LockOutcome::Contended) | None => all_ok = false,
                Some(LockOutcome::Fatal(err)) => {
                    all_ok = false;
                    fatal = Some(err);
                }
            }
        }

        if let Some(err) = fatal {
            release_all(&release_tx, paths.len()).await;
            return Err(err);
        }
        if !all_ok {
            release_all(&release_tx, paths.len()).await;
            return Ok(None);
        }

        for input in &transition.input_paths {
            if tokio::fs::metadata(input).await.is_err() {
                tracing::debug!(
                    transition_id = transition.id,
                    path = %input.display(),
                    "input vanished after locking, releasing and retrying next tick"
                );
                release_all(&release_tx, paths.len()).await;
                return Ok(None);
            }
        }

        Ok(Some(release_tx))
    }
}

async fn release_all(release_tx: &mpsc::Sender<()>, n: usize) {
    for _ in 0..n {
        let _ = release_tx.send(()).await;
    }
}

#[cfg(test)]
#[path = "locker_tests.rs"]
mod tests;
