mod cli;
mod commands;
mod observability;
mod output;
mod paths;

use std::process::ExitCode;

use anyhow::{Context, Result};
use bozor_auth::{FileSessionStore, GateConfig};
use clap::Parser;

use cli::{Cli, Commands, ConfigCommands};
use output::print_error;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present; a missing file is fine
    if let Err(e) = dotenvy::dotenv()
        && !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
    {
        eprintln!("Warning: Failed to load .env file: {e}");
    }

    let cli = Cli::parse();
    observability::init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = paths::config_path(&cli.config)?;
    let session_path = paths::session_path(&cli.session_file)?;
    let store = FileSessionStore::new(&session_path);

    match &cli.command {
        Commands::Login(args) => commands::session::login(&store, args).await?,
        Commands::Logout => commands::session::logout(&store).await?,
        Commands::Whoami => commands::session::whoami(&store).await?,
        Commands::Check(args) => {
            let config = load_config(&config_path)?;
            return commands::check::check(store, config, args).await;
        }
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => commands::config::show(&load_config(&config_path)?)?,
            ConfigCommands::Paths => commands::config::paths(&config_path, &session_path),
        },
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(path: &std::path::Path) -> Result<GateConfig> {
    let config = GateConfig::load(Some(path))
        .with_context(|| format!("Invalid configuration ({})", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        api_base_url = %config.api_base_url,
        "Configuration loaded"
    );
    Ok(config)
}
