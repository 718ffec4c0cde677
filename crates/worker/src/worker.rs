// SPDX-License-Identifier: MIT

//! `Worker`: executes one locked Transition's command, disposes of its
//! files, and releases its locks (spec.md §4.4).

use crate::error::{ExecutionError, WorkerError};
use pmjq_core::Transition;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader, BufWriter};
use tokio::process::Command;

/// Stream-pump buffer size, spec.md §4.4 step 3 ("fixed-size chunks, e.g.
/// 4 KiB").
pub const CHUNK_SIZE: usize = 4096;

/// What `Worker::run` did with its slot, for the Spawner's availableWorkers
/// return and the daemon's fatal-abort decision.
pub struct WorkerResult {
    pub slot: usize,
    pub transition_id: u64,
    /// `Some(reason)` when spec.md §4.4's "no error template configured"
    /// abort condition was hit, or the command template itself could not
    /// be parsed into argv — the caller must log it and exit the process.
    pub fatal: Option<String>,
}

enum Outcome {
    Exited(i32),
    Errored(ExecutionError),
}

pub struct Worker;

impl Worker {
    /// Run `transition`'s command to completion on the given worker
    /// `slot`, dispose of its files per the success/failure rules, and
    /// release every lock it holds. Never panics on a misbehaving child;
    /// the only abort path is the explicit `fatal` return. Equivalent to
    /// [`Worker::run_with_timeout`] with no per-job timeout (spec.md §9's
    /// open question defaults to "none").
    pub async fn run(transition: Transition, slot: usize) -> WorkerResult {
        Self::run_with_options(transition, slot, CHUNK_SIZE, None).await
    }

    /// Same as [`Worker::run`], but kills the child and treats it as a
    /// failure (quarantine-or-abort, same as any other
    /// [`ExecutionError`]) if it has not exited within `job_timeout`.
    pub async fn run_with_timeout(
        transition: Transition,
        slot: usize,
        job_timeout: Option<Duration>,
    ) -> WorkerResult {
        Self::run_with_options(transition, slot, CHUNK_SIZE, job_timeout).await
    }

    /// Same as [`Worker::run`], with every ambient constant
    /// (`pmjq-daemon::Config`'s `PMJQ_CHUNK_SIZE`/`PMJQ_JOB_TIMEOUT_MS`)
    /// overridden explicitly.
    pub async fn run_with_options(
        mut transition: Transition,
        slot: usize,
        chunk_size: usize,
        job_timeout: Option<Duration>,
    ) -> WorkerResult {
        let transition_id = transition.id;
        Self::resolve_log_path(&mut transition);
        let outcome = Self::execute(&transition, chunk_size, job_timeout).await;

        let fatal = match outcome {
            Err(template_err) => {
                tracing::error!(transition_id, error = %template_err, "fatal: bad command template");
                Some(template_err.to_string())
            }
            Ok(Outcome::Exited(0)) => {
                Self::dispose_success(&transition).await;
                tracing::info!(transition_id, "transition completed successfully");
                None
            }
            Ok(Outcome::Exited(code)) => {
                Self::dispose_failure(&mut transition, slot, &format!("exit code {code}")).await
            }
            Ok(Outcome::Errored(err)) => {
                let reason = err.to_string();
                Self::dispose_failure(&mut transition, slot, &reason).await
            }
        };

        Self::release_locks(&transition).await;
        WorkerResult {
            slot,
            transition_id,
            fatal,
        }
    }

    /// Expand `logTemplate` once, up front, and stash it on the
    /// `Transition` itself (spec.md §3: `logPath` is one of the fields a
    /// concrete candidate carries) so every later step — the stderr pump,
    /// disposition logging — reads the same computed path rather than
    /// re-expanding the template.
    fn resolve_log_path(transition: &mut Transition) {
        transition.log_path = transition.config.log_template.as_ref().map(|log_template| {
            log_template
                .dir()
                .join(pmjq_template::expand(log_template.template(), transition))
        });
    }

    async fn execute(
        transition: &Transition,
        chunk_size: usize,
        job_timeout: Option<Duration>,
    ) -> Result<Outcome, WorkerError> {
        let expanded = pmjq_template::expand(&transition.config.cmd_template, transition);
        let argv = pmjq_shell::split_words(&expanded)?;
        let Some((program, args)) = argv.split_first() else {
            unreachable!("split_words never returns Ok with an empty argv");
        };

        match Self::spawn_and_pump(program, args, transition, chunk_size, job_timeout).await {
            Ok(code) => Ok(Outcome::Exited(code)),
            Err(err) => Ok(Outcome::Errored(err)),
        }
    }

    async fn spawn_and_pump(
        program: &str,
        args: &[String],
        transition: &Transition,
        chunk_size: usize,
        job_timeout: Option<Duration>,
    ) -> Result<i32, ExecutionError> {
        let single_input = transition.input_paths.len() == 1;
        let single_output = transition.output_paths.len() == 1;
        let has_log = transition.config.log_template.is_some();

        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(if single_input {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(if single_output {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stderr(if has_log { Stdio::piped() } else { Stdio::null() });

        let mut child = cmd.spawn().map_err(ExecutionError::Spawn)?;

        let mut pumps: Vec<tokio::task::JoinHandle<std::io::Result<()>>> = Vec::new();

        if single_input {
            if let Some(mut stdin) = child.stdin.take() {
                let input_path = transition.input_paths[0].clone();
                pumps.push(tokio::spawn(async move {
                    let file = tokio::fs::File::open(&input_path).await?;
                    let mut reader = BufReader::with_capacity(chunk_size, file);
                    tokio::io::copy(&mut reader, &mut stdin).await?;
                    stdin.shutdown().await
                }));
            }
        }

        if single_output {
            if let Some(mut stdout) = child.stdout.take() {
                let output_path = transition.output_paths[0].clone();
                pumps.push(tokio::spawn(async move {
                    let file = tokio::fs::File::create(&output_path).await?;
                    let mut writer = BufWriter::with_capacity(chunk_size, file);
                    tokio::io::copy(&mut stdout, &mut writer).await?;
                    writer.flush().await
                }));
            }
        }

        if let Some(log_path) = transition.log_path.clone() {
            if let Some(mut stderr) = child.stderr.take() {
                pumps.push(tokio::spawn(async move {
                    let file = tokio::fs::File::create(&log_path).await?;
                    let mut writer = BufWriter::with_capacity(chunk_size, file);
                    tokio::io::copy(&mut stderr, &mut writer).await?;
                    writer.flush().await
                }));
            }
        }

        let run_to_completion = async {
            for pump in pumps {
                match pump.await {
                    Ok(Ok(())) => {}
                    Ok(Err(io_err)) => return Err(ExecutionError::Pump(io_err)),
                    Err(_join_err) => {
                        return Err(ExecutionError::Pump(std::io::Error::other(
                            "stream pump task panicked",
                        )))
                    }
                }
            }

            let status = child.wait().await.map_err(ExecutionError::Wait)?;
            Ok(status.code().unwrap_or(-1))
        };

        match job_timeout {
            None => run_to_completion.await,
            Some(duration) => match tokio::time::timeout(duration, run_to_completion).await {
                Ok(result) => result,
                Err(_elapsed) => {
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    Err(ExecutionError::Timeout)
                }
            },
        }
    }

    async fn dispose_success(transition: &Transition) {
        for input in &transition.input_paths {
            if let Err(err) = tokio::fs::remove_file(input).await {
                tracing::warn!(
                    transition_id = transition.id,
                    path = %input.display(),
                    error = %err,
                    "failed to remove input after success"
                );
            }
        }
    }

    /// Quarantine every input and remove any partial outputs. Returns
    /// `Some(reason)` when no error templates are configured — spec.md
    /// §4.4's intentional "no safety net configured" abort.
    async fn dispose_failure(
        transition: &mut Transition,
        slot: usize,
        reason: &str,
    ) -> Option<String> {
        if transition.config.error_templates.is_empty() {
            tracing::error!(
                transition_id = transition.id,
                slot,
                reason,
                "command failed with no error templates configured, aborting daemon"
            );
            return Some(format!(
                "transition {} failed ({reason}) with no error templates configured",
                transition.id
            ));
        }

        // spec.md §3 invariant 2: `|errorPaths| = |errorTemplates|`, all-or-
        // nothing. Expand every path up front (borrowing `transition` as the
        // template context) before mutating it.
        transition.error_paths = transition
            .config
            .error_templates
            .iter()
            .map(|error_template| {
                error_template
                    .dir()
                    .join(pmjq_template::expand(error_template.template(), transition))
            })
            .collect();

        for (input, error_path) in transition.input_paths.iter().zip(transition.error_paths.iter()) {
            if let Err(err) = tokio::fs::rename(input, error_path).await {
                tracing::error!(
                    transition_id = transition.id,
                    path = %input.display(),
                    error = %err,
                    "failed to quarantine input"
                );
            }
        }
        for output in &transition.output_paths {
            let _ = tokio::fs::remove_file(output).await;
        }
        tracing::warn!(transition_id = transition.id, reason, "transition quarantined");
        None
    }

    async fn release_locks(transition: &Transition) {
        if let Some(release_tx) = &transition.lock_release {
            for _ in 0..transition.lock_count() {
                let _ = release_tx.send(()).await;
            }
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
