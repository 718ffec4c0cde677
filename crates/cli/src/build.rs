// SPDX-License-Identifier: MIT

//! Translates validated CLI arguments into `pmjq_core::TransitionConfig`
//! and `pmjq_daemon::Config`. Kept separate from `main.rs` so the
//! validation rules (spec.md §6's arity table) are unit-testable without
//! a `tokio` runtime.

use crate::args::Cli;
use crate::error::CliError;
use pmjq_core::{DirPattern, DirTemplate, TransitionConfig};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_OUTPUT_TEMPLATE: &str = "{{.Input 0}}";

/// Enforce spec.md §6's arity rules that `clap` itself cannot express:
/// `--invariant` required iff `--input` appears at least twice, and
/// `--error` given 0 times or exactly once per `--input`.
fn validate(cli: &Cli) -> Result<(), CliError> {
    let multi_input = cli.input.len() >= 2;
    match (&cli.invariant, multi_input) {
        (None, true) => return Err(CliError::MissingInvariant),
        (Some(_), false) => return Err(CliError::UnexpectedInvariant),
        _ => {}
    }
    if !cli.error.is_empty() && cli.error.len() != cli.input.len() {
        return Err(CliError::ErrorArityMismatch {
            inputs: cli.input.len(),
            errors: cli.error.len(),
        });
    }
    Ok(())
}

/// Build the per-seed `TransitionConfig` this process will run, failing
/// on the first malformed pattern/template or arity violation.
pub fn transition_config(cli: &Cli) -> anyhow::Result<TransitionConfig> {
    validate(cli)?;

    let input_patterns = cli
        .input
        .iter()
        .map(|spec| DirPattern::parse(spec))
        .collect::<Result<Vec<_>, _>>()?;

    let output_templates = cli
        .output
        .iter()
        .map(|spec| DirTemplate::parse(spec, DEFAULT_OUTPUT_TEMPLATE))
        .collect::<Result<Vec<_>, _>>()?;

    let error_templates = cli
        .error
        .iter()
        .map(|spec| DirTemplate::parse(spec, DEFAULT_OUTPUT_TEMPLATE))
        .collect::<Result<Vec<_>, _>>()?;

    let log_template = cli
        .stderr
        .as_ref()
        .map(|spec| DirTemplate::parse(spec, DEFAULT_OUTPUT_TEMPLATE))
        .transpose()?
        .map(Arc::new);

    Ok(TransitionConfig {
        input_patterns: Arc::new(input_patterns),
        output_templates: Arc::new(output_templates),
        error_templates: Arc::new(error_templates),
        log_template,
        invariant_template: cli.invariant.clone().map(Arc::new),
        cmd_template: Arc::new(cli.cmd_template.clone()),
        quit_when_empty: cli.quit_when_empty,
    })
}

/// Build the ambient `pmjq_daemon::Config`, layering the CLI's
/// `--workers`/`--job-timeout`/`--log-file` over the environment
/// overrides `Config::from_env` already knows about.
pub fn daemon_config(cli: &Cli) -> pmjq_daemon::Config {
    pmjq_daemon::Config::from_env(
        cli.workers,
        cli.job_timeout.map(Duration::from_secs),
        cli.log_file.clone(),
    )
}

#[cfg(test)]
#[path = "build_tests.rs"]
mod tests;
