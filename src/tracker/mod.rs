//! Issue tracker abstraction.
//!
//! This module defines the seam between account validation and the system
//! of record:
//!
//! - [`IssueTracker`] - Project listing and worklog creation
//! - [`JiraClient`] - Jira REST v2 implementation
//! - `MockTracker` - In-memory implementation recording every call
//!   (tests and the `test-utils` feature)

mod jira;
#[cfg(any(test, feature = "test-utils"))]
mod mock;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{NewWorklog, Project, Worklog};

pub use jira::JiraClient;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{MockTracker, TrackerCall};

/// Operations this layer needs from the external tracker.
///
/// Implementations surface authentication, permission, and API failures
/// with the tracker's own message so callers see it verbatim.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists every project the configured credentials can see.
    async fn list_projects(&self) -> Result<Vec<Project>, AppError>;

    /// Creates a worklog on `worklog.issue_key` and returns Jira's record.
    async fn add_worklog(&self, worklog: &NewWorklog) -> Result<Worklog, AppError>;
}

/// Shared handle to the configured tracker.
pub type Tracker = Arc<dyn IssueTracker>;
