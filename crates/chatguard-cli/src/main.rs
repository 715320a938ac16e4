//! ChatGuard CLI
//!
//! Classifies game-server chat with the caps / repeat filter, re-evaluates
//! stored history under a strictness profile, and replays history through
//! a moderated chat room.

use anyhow::Result;
use chatguard_cli::{commands, load_config, log_directive, Cli, Commands};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::io::{BufRead, Write};
use std::process::ExitCode;
use tracing::info;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose);

    let config = load_config(&cli.config, cli.command.profile())?;
    info!(profile = %config.profile, staff = config.staff.len(), "configuration loaded");

    let metrics_handle = if cli.command.wants_metrics() {
        Some(init_metrics()?)
    } else {
        None
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let code = match cli.command {
        Commands::Check { messages, json, .. } => {
            let messages = if messages.is_empty() {
                read_stdin_lines()?
            } else {
                messages
            };
            let any_blocked = commands::check(&config, &messages, json, &mut out)?;
            if any_blocked {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Commands::Scan { history, json, .. } => {
            let history = commands::load_history(&history)?;
            commands::scan(&config, history, json, &mut out)?;
            ExitCode::SUCCESS
        }
        Commands::Replay { history, json, .. } => {
            let history = commands::load_history(&history)?;
            commands::replay(&config, history, json, &mut out)?;
            ExitCode::SUCCESS
        }
        Commands::Profiles => {
            commands::profiles(&config, &mut out)?;
            ExitCode::SUCCESS
        }
    };

    if let Some(handle) = metrics_handle {
        write!(out, "{}", handle.render())?;
    }
    out.flush()?;

    Ok(code)
}

fn read_stdin_lines() -> Result<Vec<String>> {
    let lines = std::io::stdin()
        .lock()
        .lines()
        .collect::<std::io::Result<Vec<_>>>()?;
    Ok(lines)
}

/// Initialize tracing/logging on stderr, keeping stdout for command output
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new(log_directive(true))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_directive(false)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Install the Prometheus recorder and return the handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "chatguard_messages_classified_total",
        "Messages run through the caps / repeat filter"
    );
    metrics::describe_counter!(
        "chatguard_blocked_total",
        "Filter verdicts that newly blocked a message, by reason code"
    );
    metrics::describe_counter!(
        "chatguard_signal_flags_total",
        "Messages flagged by a content signal"
    );
    metrics::describe_counter!(
        "chatguard_rejected_total",
        "Messages rejected by a ban, the chat lock or the flood delay"
    );
    metrics::describe_counter!(
        "chatguard_reclassifications_total",
        "Verdicts changed by re-evaluation"
    );
    metrics::describe_histogram!(
        "chatguard_classifier_latency_us",
        metrics::Unit::Microseconds,
        "Filter latency in microseconds"
    );

    Ok(handle)
}
