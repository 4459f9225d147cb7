use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::json;

use agent_core::{Config, WeatherAgent, provider_from_config};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-agent", version, about = "Weather tool agent harness")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com credential.
    Configure,

    /// Run one weather invocation and print the narrative.
    Ask {
        /// Location name, address, or coordinates.
        location: String,

        /// Number of forecast days (1-10).
        #[arg(long, default_value_t = 1)]
        days: i64,

        /// Include weather alerts.
        #[arg(long)]
        alerts: bool,

        /// Print the full rendered result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration.
    Config,

    /// Print the tool definition consumed by conversational hosts.
    Definition,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Ask { location, days, alerts, json } => {
                ask(location, days, alerts, json).await
            }
            Command::Config => show_config(),
            Command::Definition => {
                println!("{}", serde_json::to_string_pretty(&WeatherAgent::definition())?);
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.set_api_key(key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn ask(location: String, days: i64, alerts: bool, as_json: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let agent = WeatherAgent::new(provider_from_config(&config));

    let result = agent
        .handle_args(json!({
            "location": location,
            "days": days,
            "include_alerts": alerts,
        }))
        .await;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", result.narrative);
    }

    Ok(())
}

fn show_config() -> anyhow::Result<()> {
    let config = Config::load()?;

    println!("config file: {}", Config::config_file_path()?.display());
    println!("api_key: {}", if config.is_configured() { "(set)" } else { "(not set)" });
    println!("basic_auth_user: {}", config.basic_auth_user);
    println!("local_tz: {}", config.local_tz);

    Ok(())
}
