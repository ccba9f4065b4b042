//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::di::Context as ContextDerive;
use crate::error::AppError;
use crate::repositories::AccountRepository;
use crate::tracker::{JiraClient, Tracker};

/// Root application context for dependency injection.
///
/// Every field is cheap to clone and read-only after startup, so concurrent
/// tool calls share it without locking.
#[derive(ContextDerive, Clone)]
pub struct Context {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Parsed account table.
    pub accounts: AccountRepository,
    /// External issue tracker.
    pub tracker: Tracker,
}

impl Context {
    /// Creates a new context with the given dependencies.
    pub fn new(config: Config, accounts: AccountRepository, tracker: Tracker) -> Self {
        Self {
            config: Arc::new(config),
            accounts,
            tracker,
        }
    }

    /// Load layered config, then build the context from it.
    pub fn load() -> Result<Self, AppError> {
        Self::from_config(Config::load()?)
    }

    /// Parse the account table and connect the Jira client described by `config`.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let accounts = AccountRepository::from_config(&config.accounts)?;
        let tracker: Tracker = Arc::new(JiraClient::from_config(&config.jira)?);
        Ok(Self::new(config, accounts, tracker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_load_builds_context_from_env() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ACCOUNT_MAPPINGS", "team-alpha:PROJ;team-beta:SUPPORT");
            jail.set_env("JIRA_URL", "https://jira.example.com");
            jail.set_env("READ_ONLY_MODE", "yes");

            let ctx = Context::load().expect("context should load");
            assert_eq!(ctx.accounts.len(), 2);
            assert!(ctx.config.server.read_only);
            Ok(())
        });
    }

    #[test]
    fn test_load_reports_config_errors() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("JIRA_URL", "https://jira.example.com");
            jail.set_env("JIRA_TIMEOUT", "soon");

            let err = Context::load().err().expect("invalid timeout must fail");
            assert!(matches!(err, AppError::Config(_)));
            assert!(err.to_string().starts_with("Configuration error:"));
            Ok(())
        });
    }

    #[test]
    fn test_load_requires_jira_url() {
        Jail::expect_with(|jail| {
            jail.clear_env();

            let err = Context::load().err().expect("missing url must fail");
            assert!(matches!(err, AppError::MissingSetting(_)));
            Ok(())
        });
    }
}
