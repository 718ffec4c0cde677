// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Lock-file creation races ("already exists") are expected contention,
/// not errors — spec.md §4.2 "Failure modes". This type only ever
/// surfaces the failures spec.md calls fatal: stat/create/write failures
/// other than already-exists.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("lock file {path} already held")]
    AlreadyLocked { path: PathBuf },

    #[error("fatal I/O error on lock file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
