// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! pmjq-daemon: wires the four pipeline stages (spec.md §2) into one
//! running process — channel construction, ambient `Config`, `tracing`
//! setup, and the top-level `run()` entry point `pmjq-cli` calls into.

mod config;
mod error;
pub mod logging;

pub use config::{Config, DEFAULT_NB_SLOTS};
pub use error::DaemonError;

use pmjq_core::{Transition, TransitionConfig, TransitionIdGen};
use pmjq_listener::DirLister;
use pmjq_locker::{sync, Locker};
use pmjq_worker::{Spawner, WorkerResult};
use tokio::sync::mpsc;

/// Channel capacity used for every inter-stage handoff. spec.md models
/// the source language's unbuffered channels, where a send blocks until a
/// matching receive; capacity 1 is the closest `tokio::sync::mpsc`
/// equivalent without the sender observing its own send complete before
/// the receiver has actually taken the value for a full rendezvous —
/// close enough for the FIFO/no-reordering guarantee spec.md §5 asks for,
/// since only one producer and one consumer ever share each channel.
const HANDOFF_CAPACITY: usize = 1;

/// Run the transition-scheduler pipeline until it terminates: either
/// `quit_when_empty` is satisfied (spec.md §4.1), or an unrecoverable
/// error aborts the daemon (spec.md §7).
///
/// `transition_config` is the seed's static configuration, built by
/// `pmjq-cli` from the parsed CLI flags. `config` is the ambient
/// configuration: poll/refresh/staleness/chunk/timeout overrides and the
/// worker-slot count.
pub async fn run(transition_config: TransitionConfig, config: Config) -> Result<(), DaemonError> {
    let ids = TransitionIdGen::new();

    let (to_locker_tx, to_locker_rx) = mpsc::channel::<Transition>(HANDOFF_CAPACITY);
    let (to_spawner_tx, to_spawner_rx) = mpsc::channel::<Transition>(HANDOFF_CAPACITY);
    let (sync_spawner, sync_locker) = sync::channel(HANDOFF_CAPACITY);
    let (results_tx, mut results_rx) =
        mpsc::channel::<WorkerResult>(config.nb_slots.max(1));

    let dirlister = DirLister::new(
        transition_config,
        ids,
        config.poll_interval,
        to_locker_tx,
    );
    let locker = Locker::with_timing(sync_locker, to_locker_rx, to_spawner_tx, config.lock_timing);
    let spawner = Spawner::with_options(
        config.nb_slots,
        sync_spawner,
        to_spawner_rx,
        results_tx,
        config.chunk_size,
        config.job_timeout,
    );

    let dirlister_handle = tokio::spawn(dirlister.run());
    let locker_handle = tokio::spawn(locker.run());
    let spawner_handle = tokio::spawn(spawner.run());

    // Drain worker results until every worker, the Spawner, the Locker
    // and the DirLister have all wound down (a closed `results_rx`
    // implies the whole chain has quiesced, since each stage's sender is
    // dropped only when that stage's task returns — see module docs on
    // each crate's `run()` for the propagation chain). A `fatal` result
    // aborts the remaining stages immediately, per spec.md §4.4's
    // "no error templates configured" rule.
    loop {
        match results_rx.recv().await {
            Some(WorkerResult {
                fatal: Some(reason),
                transition_id,
                ..
            }) => {
                tracing::error!(transition_id, reason, "aborting daemon: unrecoverable worker failure");
                dirlister_handle.abort();
                locker_handle.abort();
                spawner_handle.abort();
                return Err(DaemonError::WorkerFatal(reason));
            }
            Some(_) => continue,
            None => break,
        }
    }

    match dirlister_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => return Err(DaemonError::from(err)),
        Err(join_err) => return Err(DaemonError::TaskPanicked(join_err.to_string())),
    }
    match locker_handle.await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => return Err(DaemonError::from(err)),
        Err(join_err) => return Err(DaemonError::TaskPanicked(join_err.to_string())),
    }
    let _ = spawner_handle.await;

    Ok(())
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
