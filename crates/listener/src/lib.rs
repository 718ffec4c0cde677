// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::unwrap_used))]

//! `DirLister`: the first pipeline stage. Polls each `--input` directory on
//! a fixed interval, matches entries against their `DirPattern`, and hands
//! every invariant-agreeing tuple downstream as a freshly-minted
//! [`Transition`].

mod candidates;
mod error;

pub use candidates::build_candidates;
pub use error::ListenError;

use pmjq_core::{DirPattern, Transition, TransitionConfig, TransitionIdGen};
use std::time::Duration;
use tokio::sync::mpsc;

/// How often `DirLister` re-scans the input directories, per spec.md §4.1.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

pub struct DirLister {
    config: TransitionConfig,
    ids: TransitionIdGen,
    poll_interval: Duration,
    out_tx: mpsc::Sender<Transition>,
}

impl DirLister {
    pub fn new(
        config: TransitionConfig,
        ids: TransitionIdGen,
        poll_interval: Duration,
        out_tx: mpsc::Sender<Transition>,
    ) -> Self {
        Self {
            config,
            ids,
            poll_interval,
            out_tx,
        }
    }

    /// Run the poll loop until the downstream channel closes, a directory
    /// read fails, or (with `--quit-when-empty`) a tick finds nothing.
    pub async fn run(self) -> Result<(), ListenError> {
        loop {
            let lists = self.list_all().await?;
            let candidates = build_candidates(&self.config, &lists, &self.ids);

            if candidates.is_empty() {
                if self.config.quit_when_empty {
                    tracing::info!("input directories empty, quit-when-empty set, exiting");
                    return Ok(());
                }
            } else {
                tracing::debug!(count = candidates.len(), "dirlister found candidates");
                for transition in candidates {
                    tracing::debug!(transition_id = transition.id, "dirlister emitting candidate");
                    if self.out_tx.send(transition).await.is_err() {
                        return Err(ListenError::ChannelClosed);
                    }
                }
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn list_all(&self) -> Result<Vec<Vec<String>>, ListenError> {
        let mut lists = Vec::with_capacity(self.config.input_patterns.len());
        for pattern in self.config.input_patterns.iter() {
            lists.push(list_one(pattern).await?);
        }
        Ok(lists)
    }
}

/// List every plain-file entry in `pattern`'s directory that matches its
/// regex. `.lock` sibling files are never candidates themselves.
async fn list_one(pattern: &DirPattern) -> Result<Vec<String>, ListenError> {
    let dir = pattern.dir();
    let mut entries =
        tokio::fs::read_dir(dir)
            .await
            .map_err(|source| ListenError::ReadDir {
                path: dir.to_path_buf(),
                source,
            })?;

    let mut names = Vec::new();
    loop {
        let entry = entries
            .next_entry()
            .await
            .map_err(|source| ListenError::ReadEntry {
                path: dir.to_path_buf(),
                source,
            })?;
        let Some(entry) = entry else { break };

        let is_file = match entry.file_type().await {
            Ok(ft) => ft.is_file(),
            Err(_) => continue,
        };
        if !is_file {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(".lock") {
            continue;
        }
        if pattern.captures(&name).is_some() {
            names.push(name);
        }
    }
    Ok(names)
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
