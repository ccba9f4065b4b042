//! Integration tests against a live Jira instance.
//!
//! These tests require JIRA_URL and credentials in the environment. They only
//! read; no worklog is created.
//! Run with: `cargo test --features integration --test jira_integration`

#![cfg(feature = "integration")]

use jira_accounts::config::Config;
use jira_accounts::tracker::{IssueTracker, JiraClient};
use serial_test::serial;

fn client() -> JiraClient {
    let config = Config::load().expect("Failed to load config");
    JiraClient::from_config(&config.jira).expect("JIRA_URL must be set")
}

#[serial]
mod jira_tests {
    use super::*;

    #[tokio::test]
    async fn test_list_projects() {
        let projects = client().list_projects().await.expect("list_projects failed");
        assert!(projects.iter().all(|p| !p.key.is_empty()));
    }

    #[tokio::test]
    async fn test_worklog_on_missing_issue_fails() {
        use jira_accounts::models::NewWorklog;

        let worklog = NewWorklog {
            issue_key: "NOPE-999999999".to_string(),
            time_spent: "1m".to_string(),
            comment: None,
            started: None,
        };
        assert!(client().add_worklog(&worklog).await.is_err());
    }
}
