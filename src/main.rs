use clap::Parser;
use pvescan::cli::{Cli, Commands, ScanCommand};
use pvescan::error::{CliError, DiscoveryError};
use pvescan::output;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => match e.downcast_ref::<CliError>() {
            Some(CliError::Discovery(DiscoveryError::Cancelled)) => {
                output::print_warning("Scan cancelled.");
                ExitCode::from(130)
            }
            _ => {
                output::print_error(&format!("{:#}", e));
                ExitCode::FAILURE
            }
        },
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        verbose,
        quiet,
    } = cli;

    match command.unwrap_or_else(|| Commands::Scan(ScanCommand::default())) {
        Commands::Scan(cmd) => {
            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            cmd.execute(verbose, quiet, cancel).await?;
        }
        Commands::Subnets(cmd) => cmd.execute(quiet)?,
        Commands::Normalize(cmd) => cmd.execute()?,
    }

    Ok(())
}

/// Logs go to stderr so JSON and CSV on stdout stay parseable.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "pvescan=debug"
    } else if quiet {
        "pvescan=error"
    } else {
        "pvescan=warn"
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
