mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vitrina_core::Marketplace;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

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
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need the marketplace
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "vitrina", &mut std::io::stdout());
            Ok(())
        }

        // Auth flows sign in on their own
        Command::Auth(args) => {
            let mut mc = config::build_marketplace_config(&cli.global)?;
            mc.auth = vitrina_core::AuthCredentials::Anonymous;
            commands::auth::handle(mc, args, &cli.global).await
        }

        cmd => {
            let mut mc = config::build_marketplace_config(&cli.global)?;
            // Single invocation: no periodic tasks or follow-up refreshes.
            mc.refresh_interval_secs = 0;
            mc.reel_sweep_interval_secs = 0;
            mc.refresh_after_mutation = false;

            let marketplace = Marketplace::new(mc)?;
            marketplace.connect().await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let result = commands::dispatch(cmd, &marketplace, &cli.global).await;
            marketplace.disconnect().await;
            result
        }
    }
}
