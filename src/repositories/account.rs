//! Repository over the parsed account table.

use std::sync::Arc;

use crate::config::AccountsConfig;
use crate::error::AppError;
use crate::mappings::load_accounts;
use crate::models::Account;

/// Read-only account lookup, cheap to clone.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    accounts: Arc<[Account]>,
}

impl AccountRepository {
    /// Creates a repository over an already-built table.
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: accounts.into(),
        }
    }

    /// Parse the account table from configuration.
    pub fn from_config(config: &AccountsConfig) -> Result<Self, AppError> {
        load_accounts(config).map(Self::new)
    }

    /// All accounts in configured order.
    pub fn all(&self) -> &[Account] {
        &self.accounts
    }

    /// Find an account by exact id.
    pub fn get(&self, account_id: &str) -> Result<&Account, AppError> {
        self.accounts
            .iter()
            .find(|a| a.id == account_id)
            .ok_or_else(|| AppError::AccountNotFound(account_id.to_string()))
    }

    /// Accounts whose id or name contains `filter`, ignoring case.
    ///
    /// A missing or blank filter returns every account.
    pub fn search(&self, filter: Option<&str>) -> Vec<&Account> {
        match filter.map(str::trim).filter(|f| !f.is_empty()) {
            Some(needle) => self.accounts.iter().filter(|a| a.matches(needle)).collect(),
            None => self.accounts.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
