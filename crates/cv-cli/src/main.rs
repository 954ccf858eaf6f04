//! # carevault CLI entry point
//!
//! Parses command-line arguments, sets up logging and dispatches to
//! subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use cv_cli::config::CliConfig;
use cv_cli::context::AppContext;
use cv_cli::query::{self, DatasetsArgs, HistoryArgs, LogsArgs, ReportArgs};
use cv_cli::upload::{self, UploadArgs};

/// CareVault: healthcare dataset compliance dashboard.
///
/// Reports dataset validation status and access activity, and simulates
/// uploading a dataset through the compliance checks.
#[derive(Parser, Debug)]
#[command(name = "carevault", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// YAML file with the compliance policies to use instead of the defaults.
    #[arg(long, global = true)]
    policies: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dataset status counts, compliance rate and recent activity.
    Dashboard,

    /// Compliance rates, breakdowns, top actors and access trend.
    Report(ReportArgs),

    /// List datasets, optionally filtered.
    Datasets(DatasetsArgs),

    /// List access-log entries, optionally filtered.
    Logs(LogsArgs),

    /// List compliance policies.
    #[command(name = "policies")]
    PolicyList,

    /// Show the validation history of one dataset.
    History(HistoryArgs),

    /// Upload a dataset and run the compliance checks.
    Upload(UploadArgs),
}

fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json(value: &impl Serialize) -> anyhow::Result<u8> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(0)
}

async fn dispatch(command: Commands, ctx: &AppContext) -> anyhow::Result<u8> {
    match command {
        Commands::Dashboard => print_json(&query::dashboard(ctx)),
        Commands::Report(args) => print_json(&query::report(ctx, &args)),
        Commands::Datasets(args) => print_json(&query::datasets(ctx, &args)),
        Commands::Logs(args) => print_json(&query::logs(ctx, &args)),
        Commands::PolicyList => print_json(&query::policies(ctx)),
        Commands::History(args) => print_json(&query::history(ctx, &args)?),
        Commands::Upload(args) => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    tracing::warn!("interrupt received, cancelling upload");
                    on_interrupt.cancel();
                }
            });
            let report = upload::upload(ctx, &args, cancel).await?;
            print_json(&report)?;
            Ok(if report.outcome.verdict == cv_core::Verdict::Passed {
                0
            } else {
                2
            })
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<u8> {
    let config = CliConfig::from_env()?;
    tracing::debug!(?config, "configuration loaded");
    let ctx = AppContext::load(config, cli.policies.as_deref())?;
    dispatch(cli.command, &ctx).await
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    match run(cli).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
