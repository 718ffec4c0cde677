// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! pmjq-worker: the worker-slot pool and command-execution stages
//! (spec.md §4.3, §4.4) — `Spawner` claims a slot and hands it to a
//! detached `Worker`, which runs the Transition's command, pumps its
//! stdio streams, and disposes of its files.

mod error;
mod spawner;
mod worker;

pub use error::{ExecutionError, WorkerError};
pub use spawner::Spawner;
pub use worker::{Worker, WorkerResult, CHUNK_SIZE};
