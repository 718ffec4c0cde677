// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! pmjq-locker: the `LockFile` primitive and the `Locker` stage that
//! claims every lock a candidate `Transition` needs before handing it to
//! the Spawner (spec.md §4.2).

mod error;
mod locker;
mod lockfile;
pub mod sync;

pub use error::LockError;
pub use locker::Locker;
pub use lockfile::{lock_path_for, LockTiming, REFRESH_INTERVAL, STALE_AFTER};
