// SPDX-License-Identifier: MIT

//! The `LockFile` primitive (spec.md §4.2): one task per locked path,
//! using create-exclusive as the atomic claim and a nonce+generation
//! counter as the liveness signal a staleness reaper can read.

use crate::error::LockError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::time::sleep;
use uuid::Uuid;

/// How often a held lock's contents are mutated to prove liveness.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);
/// How long a lock's contents must stay unchanged before a reaper
/// concludes the holder died and removes it.
pub const STALE_AFTER: Duration = Duration::from_secs(120);

/// The two durations spec.md §4.2 names — refresh tick and staleness
/// window — bundled so `pmjq-daemon` can override both from its `Config`
/// (`PMJQ_LOCK_REFRESH_MS`/`PMJQ_STALE_AFTER_MS`) without every call site
/// threading two separate `Duration` arguments.
#[derive(Debug, Clone, Copy)]
pub struct LockTiming {
    pub refresh: Duration,
    pub stale_after: Duration,
}

impl Default for LockTiming {
    fn default() -> Self {
        Self {
            refresh: REFRESH_INTERVAL,
            stale_after: STALE_AFTER,
        }
    }
}

/// The release channel is shared by every `LockFile` task spawned for one
/// Transition: the worker sends exactly `N` releases into it and the `N`
/// tasks (successful or not) each consume one, in whatever order the
/// async mutex happens to serialize them.
pub type SharedReleaseRx = Arc<Mutex<mpsc::Receiver<()>>>;

/// Sibling lock path for `path`, per spec.md §3 invariant 5.
pub fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".lock");
    PathBuf::from(name)
}

/// Outcome of one `LockFile` task's claim attempt, reported on the shared
/// result channel. `Contended` (lock already held by someone else) is
/// ordinary back-off, per spec.md §4.2 "Failure modes"; `Fatal` is the
/// stat/create/write failure class spec.md calls fatal and must abort the
/// daemon.
#[derive(Debug)]
pub enum LockOutcome {
    Acquired,
    Contended,
    Fatal(LockError),
}

/// Spawn one `LockFile` task for `path`. Reports its [`LockOutcome`] on
/// `result_tx` as soon as the claim attempt resolves, then waits for (and
/// consumes) exactly one release signal before exiting — releasing the
/// lock file itself only if the claim actually succeeded.
pub fn spawn(
    path: PathBuf,
    nonce: Uuid,
    result_tx: mpsc::Sender<LockOutcome>,
    release_rx: SharedReleaseRx,
) -> tokio::task::JoinHandle<()> {
    spawn_with_timing(path, nonce, result_tx, release_rx, LockTiming::default())
}

/// Same as [`spawn`], but with the refresh/staleness durations overridden
/// (`pmjq-daemon::Config` threads its own values through here).
pub fn spawn_with_timing(
    path: PathBuf,
    nonce: Uuid,
    result_tx: mpsc::Sender<LockOutcome>,
    release_rx: SharedReleaseRx,
    timing: LockTiming,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let lock_path = lock_path_for(&path);
        match try_create(&lock_path, nonce).await {
            Ok(()) => {
                let _ = result_tx.send(LockOutcome::Acquired).await;
                hold_until_released(lock_path, nonce, release_rx, timing.refresh).await;
            }
            Err(LockError::AlreadyLocked { .. }) => {
                spawn_staleness_reaper(lock_path, timing.stale_after);
                let _ = result_tx.send(LockOutcome::Contended).await;
                wait_for_release(&release_rx).await;
            }
            Err(err) => {
                tracing::error!(path = %lock_path.display(), error = %err, "fatal lock I/O error");
                let _ = result_tx.send(LockOutcome::Fatal(err)).await;
                wait_for_release(&release_rx).await;
            }
        }
    })
}

async fn wait_for_release(release_rx: &SharedReleaseRx) {
    let mut rx = release_rx.lock().await;
    rx.recv().await;
}

async fn hold_until_released(
    lock_path: PathBuf,
    nonce: Uuid,
    release_rx: SharedReleaseRx,
    refresh: Duration,
) {
    let mut generation: u64 = 0;
    loop {
        tokio::select! {
            _ = sleep(refresh) => {
                generation += 1;
                if let Err(err) = write_contents(&lock_path, nonce, generation).await {
                    tracing::warn!(path = %lock_path.display(), error = %err, "failed to refresh lock contents, still holding");
                }
            }
            _ = wait_for_release(&release_rx) => {
                let _ = tokio::fs::remove_file(&lock_path).await;
                return;
            }
        }
    }
}

async fn try_create(lock_path: &Path, nonce: Uuid) -> Result<(), LockError> {
    match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)
        .await
    {
        Ok(mut file) => {
            use tokio::io::AsyncWriteExt;
            let body = format!("{nonce} 0");
            file.write_all(body.as_bytes())
                .await
                .map_err(|source| LockError::Io {
                    path: lock_path.to_path_buf(),
                    source,
                })?;
            Ok(())
        }
        Err(source) if source.kind() == std::io::ErrorKind::AlreadyExists => {
            Err(LockError::AlreadyLocked {
                path: lock_path.to_path_buf(),
            })
        }
        Err(source) => Err(LockError::Io {
            path: lock_path.to_path_buf(),
            source,
        }),
    }
}

async fn write_contents(lock_path: &Path, nonce: Uuid, generation: u64) -> Result<(), LockError> {
    tokio::fs::write(lock_path, format!("{nonce} {generation}"))
        .await
        .map_err(|source| LockError::Io {
            path: lock_path.to_path_buf(),
            source,
        })
}

/// If `lock_path` already existed when we tried to claim it, read its
/// contents, sleep the quiescence window, and remove it if the contents
/// never changed — the holder died without refreshing. Detached: it must
/// outlive the `LockFile` task that spawned it (that task exits as soon
/// as it has reported failure and consumed its release signal).
fn spawn_staleness_reaper(lock_path: PathBuf, stale_after: Duration) {
    tokio::spawn(async move {
        let before = match tokio::fs::read(&lock_path).await {
            Ok(bytes) => bytes,
            Err(_) => return,
        };
        sleep(stale_after).await;
        if let Ok(after) = tokio::fs::read(&lock_path).await {
            if after == before {
                tracing::warn!(path = %lock_path.display(), "stale lock detected, removing");
                let _ = tokio::fs::remove_file(&lock_path).await;
            }
        }
    });
}

#[cfg(test)]
#[path = "lockfile_tests.rs"]
mod tests;
