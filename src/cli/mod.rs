//! # Command Line Interface
//!
//! Front end for reconciling API registrations against a gateway admin API,
//! plus management of the CLI configuration file.

pub mod apis;
pub mod client;
pub mod config;
pub mod config_cmd;
pub mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "kongsync")]
#[command(about = "Reconcile API registrations against a gateway admin API")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Base URL of the gateway admin API
    #[arg(long, global = true)]
    pub admin_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Api(apis::ApiCommands),

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: config_cmd::ConfigCommands,
    },
}

/// Run CLI commands
pub async fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse()).await
}

/// Run an already parsed command line
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    initialise_logging(cli.verbose, cli.log_json)?;

    match cli.command {
        Commands::Api(command) => {
            let client = create_http_client(cli.admin_url, cli.timeout, cli.verbose)?;
            apis::handle_api_command(command, &client).await?
        }
        Commands::Config { command } => config_cmd::handle_config_command(command).await?,
    }

    Ok(())
}

/// Create the gateway client from flags, config file and environment
fn create_http_client(
    admin_url: Option<String>,
    timeout: Option<u64>,
    verbose: bool,
) -> anyhow::Result<client::GatewayClient> {
    let file_config = config::CliConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable config file");
        config::CliConfig::default()
    });

    let admin_url = config::resolve_admin_url(admin_url, &file_config);
    let timeout = config::resolve_timeout(timeout, &file_config);

    let config = client::ClientConfig { admin_url, timeout, verbose };

    Ok(client::GatewayClient::new(config)?)
}

fn initialise_logging(verbose: bool, json: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = FmtSubscriber::builder().with_env_filter(filter).with_writer(std::io::stderr);
    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    // a subscriber may already be installed when run from tests
    result.ok();
    Ok(())
}
