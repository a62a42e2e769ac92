//! Configuration management CLI commands
//!
//! Provides commands for managing ~/.kongsync/config.toml

use anyhow::{Context, Result};
use clap::Subcommand;

use super::config::CliConfig;
use super::output::{self, OutputFormat};

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Initialize configuration file with default values
    Init {
        /// Overwrite existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "yaml")]
        output: OutputFormat,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (admin_url or timeout)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get configuration file path
    Path,
}

/// Handle config commands
pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Init { force } => init_config(force)?,
        ConfigCommands::Show { output } => show_config(output)?,
        ConfigCommands::Set { key, value } => set_config(&key, &value)?,
        ConfigCommands::Path => println!("{}", CliConfig::config_path()?.display()),
    }

    Ok(())
}

fn init_config(force: bool) -> Result<()> {
    let path = CliConfig::config_path()?;

    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    CliConfig::default().save()?;

    println!("Configuration file created at: {}", path.display());
    println!("\nYou can now set values using:");
    println!("  kongsync config set admin_url <admin-api-url>");
    println!("  kongsync config set timeout <seconds>");

    Ok(())
}

fn show_config(format: OutputFormat) -> Result<()> {
    let path = CliConfig::config_path()?;

    if !path.exists() {
        println!("No configuration file found at: {}", path.display());
        println!("\nRun 'kongsync config init' to create one");
        return Ok(());
    }

    let config = CliConfig::load()?;

    match format {
        OutputFormat::Table => print_config_table(&config, &path),
        _ => output::print_output(&config, format)?,
    }

    Ok(())
}

/// Apply `key = value` to `config`
pub fn apply_setting(config: &mut CliConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "admin_url" => {
            url::Url::parse(value)
                .with_context(|| format!("Invalid admin URL: '{}'", value))?;
            config.admin_url = Some(value.to_string());
        }
        "timeout" => {
            let timeout: u64 =
                value.parse().context("Invalid timeout value. Must be a number in seconds")?;
            config.timeout = Some(timeout);
        }
        _ => {
            anyhow::bail!("Unknown configuration key: '{}'. Valid keys: admin_url, timeout", key);
        }
    }

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = CliConfig::load().unwrap_or_default();
    apply_setting(&mut config, key, value)?;
    config.save()?;

    println!("{} set to: {}", key, value);
    println!("Configuration saved to: {}", CliConfig::config_path()?.display());

    Ok(())
}

fn print_config_table(config: &CliConfig, path: &std::path::Path) {
    output::print_table_header(&[("Key", 15), ("Value", 50)]);

    println!("{:<15} {}", "admin_url", config.admin_url.as_deref().unwrap_or("<not set>"));
    println!(
        "{:<15} {}",
        "timeout",
        config.timeout.map(|t| format!("{} seconds", t)).unwrap_or_else(|| "<not set>".to_string())
    );

    println!();
    println!("Config file: {}", path.display());
    println!();
}
