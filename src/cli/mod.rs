//! CLI module.
//!
//! Subcommands:
//! - `mcp`: Run the MCP server (stdio transport)
//! - `accounts`: Print the parsed account table without contacting Jira

mod accounts;
mod mcp;

use clap::{Parser, Subcommand};

/// Jira Accounts - account-based access to Jira projects
#[derive(Parser)]
#[command(name = "jira-accounts")]
#[command(about = "MCP server grouping Jira projects into accounts for time logging")]
#[command(version)]
pub struct App {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the MCP server (stdio transport for local use)
    Mcp,

    /// Print the configured accounts and exit
    Accounts {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl App {
    /// Log level implied by `-v` flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Mcp => self.run_mcp().await,
            Command::Accounts { json } => self.run_accounts(json),
        }
    }
}
