pub mod credential_store;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{RequestDescriptor, Urgency};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "taskprice")]
#[command(about = "Price recommendations for micro-task requests")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Price a request and optionally adjust the final amount
    Estimate(EstimateArgs),

    /// Manage the stored API credential
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Args)]
pub struct EstimateArgs {
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// relaxed (or santai), normal, urgent
    #[arg(long, default_value = "normal")]
    pub urgency: Urgency,

    #[arg(long, default_value = "1")]
    pub people: i64,

    #[arg(long)]
    pub category: Option<u32>,

    /// Skip the remote service and use the heuristic only
    #[arg(long)]
    pub offline: bool,

    /// Price adjustments applied in order, e.g. --adjust 2000 --adjust -1000
    #[arg(long, allow_hyphen_values = true)]
    pub adjust: Vec<i64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(feature = "cli")]
impl EstimateArgs {
    pub fn to_request(&self) -> Result<RequestDescriptor> {
        RequestDescriptor::new(
            self.title.clone(),
            self.description.clone(),
            self.urgency,
            self.people,
            self.category,
        )
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Subcommand)]
pub enum KeyAction {
    /// Store a new API key
    Set { value: String },
    /// Remove the stored API key
    Clear,
    /// Show whether a key is stored
    Status,
}
