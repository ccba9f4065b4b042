//! In-memory tracker for tests.
//!
//! `MockTracker` serves a fixed project list, answers worklog creation with
//! a synthetic record, and records every call so tests can assert that a
//! rejected request never reached the tracker.
//!
//! ```ignore
//! let tracker = MockTracker::new(vec![Project::new("10001", "PROJ", "Project 1")]);
//! let projects = tracker.list_projects().await?;
//! assert_eq!(tracker.calls().len(), 1);
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::IssueTracker;
use crate::error::AppError;
use crate::models::{NewWorklog, Project, Worklog};

/// A call received by [`MockTracker`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerCall {
    ListProjects,
    AddWorklog(NewWorklog),
}

/// Failure the mock should return instead of succeeding.
#[derive(Debug, Clone)]
enum Failure {
    Authentication(String),
    Permission(String),
    Api { status: u16, message: String },
    Network(String),
}

impl Failure {
    fn to_error(&self) -> AppError {
        match self {
            Failure::Authentication(m) => AppError::Authentication(m.clone()),
            Failure::Permission(m) => AppError::Permission(m.clone()),
            Failure::Api { status, message } => AppError::Api {
                status: *status,
                message: message.clone(),
            },
            Failure::Network(m) => AppError::Network(m.clone()),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    calls: Vec<TrackerCall>,
    next_worklog_id: u64,
}

/// Tracker double with a fixed project list and call recording.
#[derive(Debug, Clone)]
pub struct MockTracker {
    projects: Vec<Project>,
    failure: Option<Failure>,
    state: Arc<Mutex<MockState>>,
}

impl MockTracker {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            failure: None,
            state: Arc::new(Mutex::new(MockState {
                calls: Vec::new(),
                next_worklog_id: 10000,
            })),
        }
    }

    /// Every call fails with a 401 carrying `message`.
    pub fn failing_authentication(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(Failure::Authentication(message.into()));
        self
    }

    /// Every call fails with a 403 carrying `message`.
    pub fn failing_permission(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(Failure::Permission(message.into()));
        self
    }

    /// Every call fails with the given API status and message.
    pub fn failing_api(mut self, status: u16, message: impl Into<String>) -> Self {
        self.failure = Some(Failure::Api {
            status,
            message: message.into(),
        });
        self
    }

    /// Every call fails at the transport level.
    pub fn failing_network(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(Failure::Network(message.into()));
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<TrackerCall> {
        self.lock().calls.clone()
    }

    /// Worklog requests received so far.
    pub fn worklogs(&self) -> Vec<NewWorklog> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                TrackerCall::AddWorklog(w) => Some(w.clone()),
                TrackerCall::ListProjects => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // Ignore poisoning from a panicked test
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: TrackerCall) -> Result<(), AppError> {
        self.lock().calls.push(call);
        match &self.failure {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IssueTracker for MockTracker {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        self.record(TrackerCall::ListProjects)?;
        Ok(self.projects.clone())
    }

    async fn add_worklog(&self, worklog: &NewWorklog) -> Result<Worklog, AppError> {
        self.record(TrackerCall::AddWorklog(worklog.clone()))?;

        let id = {
            let mut state = self.lock();
            state.next_worklog_id += 1;
            state.next_worklog_id
        };
        let created = "2024-01-01T10:00:00.000+0000".to_string();

        Ok(Worklog {
            id: id.to_string(),
            time_spent: Some(worklog.time_spent.clone()),
            time_spent_seconds: None,
            started: worklog.started.clone().or_else(|| Some(created.clone())),
            created: Some(created.clone()),
            updated: Some(created),
            comment: worklog.comment.clone(),
            author: None,
        })
    }
}
