// SPDX-License-Identifier: MIT

//! pmjq — a single executable wrapping `pmjq-daemon`'s pipeline behind
//! the CLI surface spec.md §6 defines.

mod args;
mod build;
mod error;

use args::Cli;
use clap::Parser;

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("pmjq: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let transition_config = build::transition_config(&cli)?;
    let daemon_config = build::daemon_config(&cli);

    let _logging_guard = pmjq_daemon::logging::init(daemon_config.log_file.as_deref())?;

    pmjq_daemon::run(transition_config, daemon_config).await?;
    Ok(())
}
