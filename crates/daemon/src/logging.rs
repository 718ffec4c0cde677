// SPDX-License-Identifier: MIT

//! Structured logging setup, grounded in the teacher's
//! `daemon/src/main.rs::setup_logging`: an `EnvFilter` (`RUST_LOG`,
//! default `info`) over an `fmt` layer, with an optional second
//! non-blocking file layer when `--log-file=<path>` is configured.
//!
//! spec.md §7 names the log stream as the daemon's sole user-visible
//! channel; stdout is reserved for whatever a single-input/single-output
//! Transition's child process streams through it, so logs always go to
//! stderr (and, optionally, a file) — never stdout.

use crate::error::DaemonError;
use std::path::Path;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Guards returned by [`init`]. Dropping either guard stops flushing its
/// writer, so the caller must keep this alive for the process lifetime.
pub struct LoggingGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the global `tracing` subscriber. Safe to call once per
/// process; a second call is a configuration error in the caller, not
/// handled here (mirrors `tracing_subscriber::registry().init()`'s own
/// single-shot contract).
pub fn init(log_file: Option<&Path>) -> Result<LoggingGuard, DaemonError> {
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);

    match log_file {
        None => {
            tracing_subscriber::registry()
                .with(env_filter())
                .with(stderr_layer)
                .init();
            Ok(LoggingGuard { _file_guard: None })
        }
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(DaemonError::Logging)?;
            }
            let dir = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path.file_name().ok_or_else(|| {
                DaemonError::Logging(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "log file path has no file name",
                ))
            })?;
            let appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter())
                .with(stderr_layer)
                .with(file_layer)
                .init();
            Ok(LoggingGuard {
                _file_guard: Some(guard),
            })
        }
    }
}
