// SPDX-License-Identifier: MIT

//! The `clap::Parser` struct mirroring spec.md §6's usage line. A flat
//! flag set rather than a subcommand tree — grounded in the teacher's
//! per-command `RunArgs`/`PipelineArgs` derive style (SPEC_FULL.md §6),
//! adapted down to PMJQ's single mode of operation.

use clap::Parser;
use std::path::PathBuf;

/// `pmjq [--quit-when-empty] --input=<p>... [--invariant=<t>] <cmdtemplate>
///       --output=<t>... [--stderr=<t>] [--error=<t>...]`
#[derive(Parser, Debug)]
#[command(name = "pmjq", version, about = "Poor Man's Job Queue")]
pub struct Cli {
    /// Exit 0 once a poll finds the Cartesian product of inputs empty,
    /// instead of looping forever.
    #[arg(long)]
    pub quit_when_empty: bool,

    /// `<dir>/<regex>`. Repeatable; at least one is required. A missing
    /// regex portion defaults to `.*`.
    #[arg(long = "input", required = true)]
    pub input: Vec<String>,

    /// Regex-replacement template used to group inputs into one round.
    /// Required when two or more `--input`s are given, forbidden
    /// otherwise.
    #[arg(long = "invariant")]
    pub invariant: Option<String>,

    /// Command template, expanded per Transition and POSIX-split before
    /// exec. Exactly one.
    pub cmd_template: String,

    /// `<dir>/<template>`. Repeatable; at least one is required. An
    /// empty template defaults to `{{.Input 0}}`.
    #[arg(long = "output", required = true)]
    pub output: Vec<String>,

    /// Log file path template. Absent means stderr is discarded.
    #[arg(long = "stderr")]
    pub stderr: Option<String>,

    /// `<dir>/<template>`, destination for a quarantined input on
    /// failure. Must be omitted entirely or given once per `--input`.
    #[arg(long = "error")]
    pub error: Vec<String>,

    /// Worker-slot pool size. spec.md names `nbSlots` but never a flag
    /// for it (SPEC_FULL.md §6.2); this repository exposes it here.
    #[arg(long = "workers", default_value_t = pmjq_daemon::DEFAULT_NB_SLOTS)]
    pub workers: usize,

    /// Per-job wall-clock timeout, in seconds. Unset means no timeout
    /// (spec.md §9's Open Question resolution, SPEC_FULL.md §6.2).
    #[arg(long = "job-timeout", value_name = "SECS")]
    pub job_timeout: Option<u64>,

    /// Append structured logs to this file in addition to stderr.
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,
}
