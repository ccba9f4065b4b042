//! Application error types.

use thiserror::Error;

/// Application-level errors for jira-accounts.
#[derive(Error, Debug)]
pub enum AppError {
    // Config errors
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    #[error("Configuration error: {0}")]
    Mapping(String),

    #[error("Configuration error: {0} is not set")]
    MissingSetting(&'static str),

    // Domain errors
    #[error("Account '{0}' not found")]
    AccountNotFound(String),

    #[error("Account '{0}' is not active")]
    AccountInactive(String),

    #[error("Project '{project}' is not associated with account '{account}'")]
    ProjectAccessDenied { account: String, project: String },

    #[error(
        "Issue '{issue}' belongs to project '{project}', which is not associated with account '{account}'"
    )]
    IssueAccessDenied {
        account: String,
        issue: String,
        project: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Read-only mode: {0} is disabled")]
    ReadOnly(String),

    // Tracker errors, messages surfaced verbatim
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Jira API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Network(err.to_string())
    }
}
