//! Accounts command handler.

use color_eyre::Result;

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Account, ProjectSet};
use crate::repositories::AccountRepository;

use super::App;

impl App {
    /// Print the parsed account table. Jira is never contacted.
    pub fn run_accounts(&self, json: bool) -> Result<()> {
        let config = Config::load().map_err(AppError::from)?;
        let accounts = AccountRepository::from_config(&config.accounts)?;
        tracing::debug!(count = accounts.len(), "Parsed account table");

        if config.jira.url.is_none() {
            tracing::warn!("JIRA_URL is not set; the MCP server will refuse to start");
        }

        if json {
            println!("{}", serde_json::to_string_pretty(accounts.all())?);
        } else {
            for account in accounts.all() {
                println!("{}", render(account));
            }
        }
        Ok(())
    }
}

fn render(account: &Account) -> String {
    let projects = match &account.projects {
        ProjectSet::Keys(keys) if keys.is_empty() => "(none)".to_string(),
        ProjectSet::Keys(keys) => keys.join(", "),
        ProjectSet::AllVisible => "(all visible projects)".to_string(),
    };
    let status = if account.is_active { "" } else { " [inactive]" };
    format!("{} ({}){}: {}", account.id, account.name, status, projects)
}
