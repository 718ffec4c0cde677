// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Directory-read I/O failures are fatal per spec.md §4.1: "Any
/// directory-read I/O failure is fatal: abort the process." Pattern-match
/// failures on individual entries are silent and never surface as an
/// error.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("failed to read input directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to inspect entry in {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("downstream channel closed")]
    ChannelClosed,
}
