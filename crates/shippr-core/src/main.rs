//! shippr CLI
//!
//! Command-line entry point for the shippr terminal client.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand};
use tracing::{error, info};

use shippr::api::ApiClient;
use shippr::auth::{CredentialStore, TokenStatus};
use shippr::tui::App;
use shippr::Config;

/// shippr - ship from your terminal
#[derive(Parser)]
#[command(name = "shippr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SHIPPR_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the shippr API
    #[arg(long, global = true, env = "SHIPPR_API_URL")]
    api_url: Option<String>,

    /// Directory holding credentials and logs (default: ~/.shippr)
    #[arg(long, global = true, env = "SHIPPR_HOME")]
    home: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the stored session
    Status,

    /// Delete the stored session
    Logout,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        generate_completions(shell);
        return ExitCode::SUCCESS;
    }

    // Load configuration
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging; the guard flushes the log file on drop
    let _guard = match config
        .storage
        .log_dir()
        .and_then(|dir| shippr::logging::init(&config.logging, &dir, cli.verbose))
    {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error initializing logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Execute command
    let result = match cli.command {
        None => run_tui(&config).await,
        Some(Commands::Status) => run_status(&config),
        Some(Commands::Logout) => run_logout(&config),
        Some(Commands::Completions { .. }) => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = Config::load(cli.config.as_deref(), cli.home.as_deref())?;

    if let Some(url) = &cli.api_url {
        config.api.url.clone_from(url);
        config.validate()?;
    }

    Ok(config)
}

fn credential_store(config: &Config) -> anyhow::Result<CredentialStore> {
    let path = config
        .storage
        .credentials_path()
        .context("resolving credentials path")?;
    Ok(CredentialStore::new(path))
}

async fn run_tui(config: &Config) -> anyhow::Result<()> {
    let credentials = credential_store(config)?;
    let api = ApiClient::new(config, credentials)?;
    info!(api_url = %api.base_url(), "Starting shippr");

    let mut app = App::new(api, &config.tui);
    app.run().await?;

    Ok(())
}

fn run_status(config: &Config) -> anyhow::Result<()> {
    let credentials = credential_store(config)?;
    let now = Utc::now();

    match credentials.status(now) {
        TokenStatus::Valid(claims) => {
            let who = claims.display_name().unwrap_or("unknown user");
            println!("Logged in as {who}");
            match claims.expires_at() {
                Some(at) => {
                    let left = (at - now).to_std().unwrap_or_default();
                    let left = Duration::from_secs(left.as_secs());
                    println!(
                        "Session expires in {} ({})",
                        humantime::format_duration(left),
                        at.to_rfc3339()
                    );
                }
                None => println!("Session does not expire"),
            }
        }
        TokenStatus::Missing => println!("Not logged in"),
        TokenStatus::Expired { expired_at } => {
            println!("Session expired at {}", expired_at.to_rfc3339());
        }
        TokenStatus::Malformed(reason) => println!("Stored token is invalid: {reason}"),
    }
    println!("Credentials: {}", credentials.path().display());

    Ok(())
}

fn run_logout(config: &Config) -> anyhow::Result<()> {
    let credentials = credential_store(config)?;
    credentials.clear()?;
    info!("Logged out from the command line");
    println!("Logged out");
    Ok(())
}

fn generate_completions(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "shippr", &mut std::io::stdout());
}
