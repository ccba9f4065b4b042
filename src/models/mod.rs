//! Domain models for accounts, projects, and worklogs.

mod account;
mod project;
mod worklog;

pub use account::{Account, ProjectSet, DEFAULT_ACCOUNT_ID, DEFAULT_ACCOUNT_NAME};
pub use project::Project;
pub use worklog::{
    format_started, IssueKey, NewWorklog, TimeLogEntry, TimeSpent, Worklog, WorklogAuthor,
};
