// SPDX-License-Identifier: MIT

//! The `Transition`: the Petri-net-inspired token that carries one unit
//! of work end-to-end through DirLister → Locker → Spawner → Worker.

use crate::id::TransitionIdGen;
use crate::pattern::{DirPattern, DirTemplate};
use crate::template_context::TemplateContext;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Static, per-process configuration shared by every `Transition` minted
/// from one seed. Cheap to clone (every field is an `Arc` or a plain
/// `String`/primitive) so each pipeline stage can hold its own copy
/// without touching a shared mutable struct.
#[derive(Debug, Clone)]
pub struct TransitionConfig {
    pub input_patterns: Arc<Vec<DirPattern>>,
    pub output_templates: Arc<Vec<DirTemplate>>,
    pub error_templates: Arc<Vec<DirTemplate>>,
    pub log_template: Option<Arc<DirTemplate>>,
    pub invariant_template: Option<Arc<String>>,
    pub cmd_template: Arc<String>,
    pub quit_when_empty: bool,
}

/// A single unit of work as it flows through the pipeline.
///
/// Built by cloning a **seed** `Transition` (carrying only
/// [`TransitionConfig`]) and minting a fresh `id`; see
/// [`Transition::clone_with_fresh_id`]. A `Transition` is otherwise never
/// shared: each stage owns it outright until it hands it to the next
/// stage over a channel.
#[derive(Debug)]
pub struct Transition {
    pub id: u64,
    pub custodian: &'static str,
    pub config: TransitionConfig,

    /// Base filenames selected this round, one per `input_patterns[i]`.
    pub input_files: Vec<String>,
    pub input_paths: Vec<PathBuf>,
    pub output_paths: Vec<PathBuf>,
    pub error_paths: Vec<PathBuf>,
    pub log_path: Option<PathBuf>,

    /// The invariant expansion all matched inputs agreed on this round.
    pub invariant: Option<String>,
    /// Named regex captures harvested from the most recently matched
    /// input file name.
    pub named_matches: HashMap<String, String>,
    /// Positional (unnamed) regex captures from the same match.
    pub positional_matches: Vec<String>,

    /// Present only once every lock (inputs + outputs) has been
    /// successfully acquired. The worker must write to it exactly
    /// `input_paths.len() + output_paths.len()` times to release every
    /// lock-holding task before the `Transition` is dropped.
    pub lock_release: Option<mpsc::Sender<()>>,

    /// Slot number, assigned once a Spawner picks this transition up.
    pub worker_id: Option<usize>,
}

impl Transition {
    /// Build a seed transition: static configuration only, no candidate
    /// data, `id = 0`, `custodian = "seed"`. Never dispatched to a
    /// worker directly — only cloned.
    pub fn seed(config: TransitionConfig) -> Self {
        Self {
            id: 0,
            custodian: "seed",
            config,
            input_files: Vec::new(),
            input_paths: Vec::new(),
            output_paths: Vec::new(),
            error_paths: Vec::new(),
            log_path: None,
            invariant: None,
            named_matches: HashMap::new(),
            positional_matches: Vec::new(),
            lock_release: None,
            worker_id: None,
        }
    }

    /// Mint a fresh `Transition` carrying this seed's static
    /// configuration and a new unique `id`. Dynamic fields (candidate
    /// data, locks, worker assignment) start empty — the caller (always
    /// `DirLister`, today) fills them in.
    pub fn clone_with_fresh_id(&self, ids: &TransitionIdGen) -> Self {
        Self {
            id: ids.next(),
            custodian: "dirlister",
            config: self.config.clone(),
            input_files: Vec::new(),
            input_paths: Vec::new(),
            output_paths: Vec::new(),
            error_paths: Vec::new(),
            log_path: None,
            invariant: None,
            named_matches: HashMap::new(),
            positional_matches: Vec::new(),
            lock_release: None,
            worker_id: None,
        }
    }

    /// Total number of locks this transition needs once output paths are
    /// known: one per input plus one per output.
    pub fn lock_count(&self) -> usize {
        self.input_paths.len() + self.output_paths.len()
    }

    /// All paths that must be locked, inputs first then outputs — the
    /// order `Locker` spawns `LockFile` tasks in.
    pub fn lockable_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.input_paths.iter().chain(self.output_paths.iter())
    }
}

impl TemplateContext for Transition {
    fn input(&self, i: usize) -> Option<&str> {
        self.input_files.get(i).map(String::as_str)
    }

    fn invariant(&self) -> Option<&str> {
        self.invariant.as_deref()
    }

    fn named(&self, key: &str) -> Option<&str> {
        self.named_matches.get(key).map(String::as_str)
    }

    fn positional(&self, index: usize) -> Option<&str> {
        self.positional_matches.get(index).map(String::as_str)
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
