//! Time logging gateway: validate against the account table, then forward
//! a worklog to Jira.
//!
//! Every check below runs before the tracker is contacted, so a rejected
//! request leaves no trace in Jira.

use std::sync::Arc;

use crate::config::Config;
use crate::di::FromContext;
use crate::error::AppError;
use crate::models::{format_started, Account, IssueKey, NewWorklog, TimeLogEntry, TimeSpent};
use crate::repositories::AccountRepository;
use crate::tracker::Tracker;

/// Input to [`TimeLogService::log_time`].
#[derive(Debug, Clone, Default)]
pub struct LogTimeRequest {
    pub account_id: String,
    /// Jira duration, e.g. `"2h"` or `"1d 4h"`.
    pub time_spent: String,
    pub issue_key: Option<String>,
    /// Project key the caller expects the issue to belong to.
    pub project_id: Option<String>,
    pub description: Option<String>,
    /// RFC 3339 start time; Jira uses "now" when absent.
    pub started: Option<String>,
}

/// A request that passed every check and is ready to forward.
struct ValidatedLog<'a> {
    account: &'a Account,
    time_spent: TimeSpent,
    worklog: NewWorklog,
    project_key: String,
}

/// Service for account-scoped time logging.
#[derive(FromContext, Clone)]
pub struct TimeLogService {
    accounts: AccountRepository,
    tracker: Tracker,
    config: Arc<Config>,
}

impl TimeLogService {
    /// Validate `request` and create the worklog in Jira.
    pub async fn log_time(&self, request: LogTimeRequest) -> Result<TimeLogEntry, AppError> {
        let validated = self.validate(&request).inspect_err(|e| {
            tracing::warn!(
                account_id = %request.account_id,
                error = %e,
                "Rejected time log request"
            );
        })?;

        let worklog = self.tracker.add_worklog(&validated.worklog).await?;

        tracing::info!(
            account_id = %validated.account.id,
            issue_key = %validated.worklog.issue_key,
            worklog_id = %worklog.id,
            seconds = validated.time_spent.seconds(),
            "Logged time"
        );

        Ok(TimeLogEntry::from_worklog(
            &validated.account.id,
            &validated.account.name,
            Some(validated.project_key),
            &validated.worklog,
            &validated.time_spent,
            worklog,
        ))
    }

    fn validate<'a>(&'a self, request: &LogTimeRequest) -> Result<ValidatedLog<'a>, AppError> {
        if self.config.server.read_only {
            return Err(AppError::ReadOnly("log_time".to_string()));
        }

        let account = self.accounts.get(request.account_id.trim())?;
        if !account.is_active {
            return Err(AppError::AccountInactive(account.id.clone()));
        }

        let time_spent: TimeSpent = request.time_spent.parse()?;

        let issue_key: IssueKey = non_blank(request.issue_key.as_deref())
            .ok_or_else(|| {
                AppError::Validation(
                    "issue_key is required: Jira worklogs are recorded against an issue".to_string(),
                )
            })?
            .parse()?;

        let filter = self.config.jira.project_filter_keys();
        let filter = filter.as_deref();

        if let Some(project) = non_blank(request.project_id.as_deref()) {
            let project = project.to_uppercase();
            if !account.includes_project(&project, filter) {
                return Err(AppError::ProjectAccessDenied {
                    account: account.id.clone(),
                    project,
                });
            }
            if issue_key.project_key() != project {
                return Err(AppError::Validation(format!(
                    "issue '{}' does not belong to project '{}'",
                    issue_key, project
                )));
            }
        }

        if !account.includes_project(issue_key.project_key(), filter) {
            return Err(AppError::IssueAccessDenied {
                account: account.id.clone(),
                issue: issue_key.to_string(),
                project: issue_key.project_key().to_string(),
            });
        }

        let started = non_blank(request.started.as_deref())
            .map(format_started)
            .transpose()?;

        let project_key = issue_key.project_key().to_string();
        Ok(ValidatedLog {
            account,
            worklog: NewWorklog {
                issue_key: issue_key.to_string(),
                time_spent: time_spent.as_str().to_string(),
                comment: non_blank(request.description.as_deref()).map(str::to_string),
                started,
            },
            time_spent,
            project_key,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
