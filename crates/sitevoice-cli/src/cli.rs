use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitevoice")]
#[command(about = "Sitevoice - edit and publish a site from plain-language commands", long_about = None)]
pub(crate) struct Cli {
    /// Log to stderr instead of the log file.
    #[arg(long, global = true, default_value_t = false)]
    pub(crate) print_logs: bool,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    #[command(about = "Start the edit endpoint")]
    Serve {
        #[arg(long)]
        port: Option<u16>,
        #[arg(long)]
        hostname: Option<String>,
        #[arg(long)]
        cors: Vec<String>,
    },
    #[command(about = "Ask the planner for a plan without changing the site")]
    Plan {
        #[arg(value_name = "COMMAND", trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
    #[command(about = "Plan a command and publish the result")]
    Apply {
        /// Apply this plan file instead of asking the planner.
        #[arg(long, value_name = "FILE")]
        plan: Option<PathBuf>,
        #[arg(value_name = "COMMAND", trailing_var_arg = true, required = true)]
        command: Vec<String>,
    },
    #[command(about = "Show the merged configuration with secrets redacted")]
    Config,
}

impl Commands {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Commands::Serve { .. } => "serve",
            Commands::Plan { .. } => "plan",
            Commands::Apply { .. } => "apply",
            Commands::Config => "config",
        }
    }
}
