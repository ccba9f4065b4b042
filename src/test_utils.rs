//! Shared fixtures for unit tests.

use std::sync::Arc;

use crate::config::Config;
use crate::context::Context;
use crate::mappings::parse_account_mappings;
use crate::models::Project;
use crate::repositories::AccountRepository;
use crate::tracker::MockTracker;

/// Projects the mock tracker serves by default.
pub fn sample_projects() -> Vec<Project> {
    vec![
        Project::new("10001", "PROJ", "Project 1"),
        Project::new("10002", "DEV", "Development Project"),
        Project::new("10003", "SUPPORT", "Support Desk"),
    ]
}

/// Build a context over `mapping` backed by `tracker`.
pub fn context(
    mapping: &str,
    tracker: &MockTracker,
    projects_filter: Option<&str>,
    read_only: bool,
) -> Context {
    let mut config = Config::default();
    config.accounts.mappings = Some(mapping.to_string());
    config.jira.projects_filter = projects_filter.map(str::to_string);
    config.server.read_only = read_only;

    let accounts = AccountRepository::new(parse_account_mappings(mapping).expect("valid mapping"));
    Context::new(config, accounts, Arc::new(tracker.clone()))
}
