//! Account lookup service: listing, project resolution, and summaries.

use std::sync::Arc;

use crate::config::Config;
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{Account, Project};
use crate::repositories::AccountRepository;
use crate::tracker::Tracker;

/// An account with its project keys resolved.
///
/// For explicit accounts these are the configured keys; for the default
/// account they are the visible project keys at call time.
#[derive(Debug, Clone)]
pub struct ResolvedAccount {
    pub account: Account,
    pub project_keys: Vec<String>,
}

/// An account and the visible projects that belong to it.
#[derive(Debug, Clone)]
pub struct AccountProjects {
    pub account: Account,
    pub projects: Vec<Project>,
}

/// An account, its visible projects, and the configured keys Jira did not return.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: Account,
    pub projects: Vec<Project>,
    pub missing_project_keys: Vec<String>,
}

/// Service for read-only account queries.
#[derive(FromContext, Clone)]
pub struct AccountService {
    accounts: AccountRepository,
    tracker: Tracker,
    config: Arc<Config>,
}

impl AccountService {
    /// Projects visible through the tracker, restricted by the projects filter.
    pub async fn visible_projects(&self) -> Result<Vec<Project>, AppError> {
        let projects = self.tracker.list_projects().await?;
        Ok(match self.config.jira.project_filter_keys() {
            Some(filter) => projects
                .into_iter()
                .filter(|p| filter.iter().any(|k| k.eq_ignore_ascii_case(&p.key)))
                .collect(),
            None => projects,
        })
    }

    /// List accounts, optionally filtered by a case-insensitive substring of
    /// id or name.
    ///
    /// The tracker is only consulted when the default account is among the
    /// results.
    pub async fn list_accounts(
        &self,
        search_filter: Option<&str>,
    ) -> Result<Vec<ResolvedAccount>, AppError> {
        let matched = self.accounts.search(search_filter);

        let visible_keys = if matched.iter().any(|a| a.is_default()) {
            Some(
                self.visible_projects()
                    .await?
                    .into_iter()
                    .map(|p| p.key)
                    .collect::<Vec<_>>(),
            )
        } else {
            None
        };

        let resolved = matched
            .into_iter()
            .map(|account| ResolvedAccount {
                project_keys: match account.project_keys() {
                    Some(keys) => keys.to_vec(),
                    None => visible_keys.clone().unwrap_or_default(),
                },
                account: account.clone(),
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            filter = ?search_filter,
            count = resolved.len(),
            "Listed accounts"
        );
        Ok(resolved)
    }

    /// Visible projects belonging to `account_id`, in tracker order.
    ///
    /// An unknown id fails before the tracker is called.
    pub async fn get_account_projects(
        &self,
        account_id: &str,
    ) -> Result<AccountProjects, AppError> {
        let account = self.accounts.get(account_id)?.clone();
        let projects = self.projects_for(&account).await?;
        Ok(AccountProjects { account, projects })
    }

    /// Account metadata plus resolved projects and any configured keys the
    /// tracker no longer shows.
    pub async fn get_account_summary(&self, account_id: &str) -> Result<AccountSummary, AppError> {
        let account = self.accounts.get(account_id)?.clone();
        let projects = self.projects_for(&account).await?;

        let missing_project_keys = account
            .project_keys()
            .unwrap_or_default()
            .iter()
            .filter(|key| !projects.iter().any(|p| p.key.eq_ignore_ascii_case(key)))
            .cloned()
            .collect::<Vec<_>>();

        if !missing_project_keys.is_empty() {
            tracing::warn!(
                account_id = %account.id,
                missing = ?missing_project_keys,
                "Configured project keys are not visible in Jira"
            );
        }

        Ok(AccountSummary {
            account,
            projects,
            missing_project_keys,
        })
    }

    async fn projects_for(&self, account: &Account) -> Result<Vec<Project>, AppError> {
        let visible = self.visible_projects().await?;
        Ok(visible
            .into_iter()
            .filter(|p| account.includes_project(&p.key, None))
            .collect())
    }
}
