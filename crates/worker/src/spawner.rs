// SPDX-License-Identifier: MIT

//! `Spawner`: owns the worker-slot pool and the Locker handshake, and
//! dispatches a detached [`crate::Worker`] task per claimed slot
//! (spec.md §4.3).

use crate::worker::{Worker, WorkerResult, CHUNK_SIZE};
use pmjq_core::Transition;
use pmjq_locker::sync::{Slot, SpawnerHalf};
use std::time::Duration;
use tokio::sync::mpsc;

pub struct Spawner {
    sync: SpawnerHalf,
    from_locker: mpsc::Receiver<Transition>,
    available_tx: mpsc::Sender<usize>,
    available_rx: mpsc::Receiver<usize>,
    results_tx: mpsc::Sender<WorkerResult>,
    chunk_size: usize,
    job_timeout: Option<Duration>,
}

impl Spawner {
    /// `nb_slots` worker positions are preloaded into the available pool,
    /// matching spec.md §4.3's `availableWorkers` channel seeded with
    /// `0..nbSlots-1`. Workers spawned from this pool use the default
    /// stream-pump chunk size and no per-job timeout; see
    /// [`Spawner::with_options`] to override either.
    pub fn new(
        nb_slots: usize,
        sync: SpawnerHalf,
        from_locker: mpsc::Receiver<Transition>,
        results_tx: mpsc::Sender<WorkerResult>,
    ) -> Self {
        Self::with_options(nb_slots, sync, from_locker, results_tx, CHUNK_SIZE, None)
    }

    /// Same as [`Spawner::new`], but with the stream-pump chunk size and
    /// per-job timeout overridden — `pmjq-daemon::Config` uses this to
    /// thread `PMJQ_CHUNK_SIZE`/`PMJQ_JOB_TIMEOUT_MS` down to every
    /// `Worker` this `Spawner` dispatches.
    pub fn with_options(
        nb_slots: usize,
        sync: SpawnerHalf,
        from_locker: mpsc::Receiver<Transition>,
        results_tx: mpsc::Sender<WorkerResult>,
        chunk_size: usize,
        job_timeout: Option<Duration>,
    ) -> Self {
        let (available_tx, available_rx) = mpsc::channel(nb_slots.max(1));
        for slot in 0..nb_slots {
            // Capacity is exactly `nb_slots`, so this never backs up.
            let _ = available_tx.try_send(slot);
        }
        Self {
            sync,
            from_locker,
            available_tx,
            available_rx,
            results_tx,
            chunk_size,
            job_timeout,
        }
    }

    /// Runs until either upstream channel closes. Since a slot is offered
    /// to the Locker one at a time, and the Locker processes one
    /// candidate `Transition` at a time, there is never more than one
    /// reservation outstanding — so the race between "reservation
    /// returned" and "transition arrived" below can never pair a
    /// transition with the wrong slot.
    pub async fn run(mut self) {
        loop {
            let Some(slot) = self.available_rx.recv().await else {
                return;
            };
            if self.sync.reserve(Slot(slot)).await.is_err() {
                return;
            }

            tokio::select! {
                returned = self.sync.recv_returned() => {
                    let Some(_) = returned else { return; };
                    let _ = self.available_tx.send(slot).await;
                }
                transition = self.from_locker.recv() => {
                    let Some(transition) = transition else { return; };
                    self.dispatch(transition, slot);
                }
            }
        }
    }

    fn dispatch(&self, transition: Transition, slot: usize) {
        let results_tx = self.results_tx.clone();
        let available_tx = self.available_tx.clone();
        let chunk_size = self.chunk_size;
        let job_timeout = self.job_timeout;
        tokio::spawn(async move {
            let result = Worker::run_with_options(transition, slot, chunk_size, job_timeout).await;
            let fatal = result.fatal.is_some();
            let _ = results_tx.send(result).await;
            if !fatal {
                let _ = available_tx.send(slot).await;
            }
        });
    }
}

#[cfg(test)]
#[path = "spawner_tests.rs"]
mod tests;
