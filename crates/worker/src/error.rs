// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Command-template expansion to an unparsable shell line is spec.md
/// §7's "bad template" — a static, per-daemon configuration mistake, not
/// a one-off input problem, so it is fatal rather than routed through
/// the per-transition quarantine path.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("command template expanded to an unparsable shell line: {0}")]
    BadCommandTemplate(#[from] pmjq_shell::ShellError),
}

/// Everything that can go wrong while actually running one Transition's
/// command: spawn failure, a stream pump I/O error, or a failure to reap
/// the child. These are *not* fatal on their own — spec.md §7 groups them
/// with "child non-zero exit" under the same quarantine-or-abort
/// disposition decided by whether error templates are configured.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("failed to spawn command: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("stream pump failed: {0}")]
    Pump(#[source] std::io::Error),

    #[error("failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("command exceeded its job timeout")]
    Timeout,
}
