mod cli;
mod commands;
mod config;
mod error;
mod output;
mod snapshot;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli {
        mut global,
        command,
    } = cli;

    match command {
        // Completions need neither config nor snapshot
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "netseg", &mut std::io::stdout());
            Ok(())
        }

        // Config commands don't need a snapshot
        Command::Config(args) => {
            let cfg = config::load_config()?;
            config::apply_defaults(&mut global, &cfg)?;
            commands::config_cmd::handle(args, &global)
        }

        // All other commands analyze a snapshot
        cmd => {
            let cfg = config::load_config()?;
            config::apply_defaults(&mut global, &cfg)?;
            let settings = config::resolve_snapshot(&global, &cfg)?;
            let analyzer = snapshot::open(&settings).await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &analyzer, &global).await
        }
    }
}
