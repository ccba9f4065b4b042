//! Worklog models: duration parsing, issue keys, and the request/response
//! shapes exchanged with Jira.

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
/// Jira's default working day.
const DAY: f64 = 8.0 * HOUR;
/// Jira's default working week.
const WEEK: f64 = 5.0 * DAY;

/// Timestamp layout Jira expects for `started`.
const JIRA_TIMESTAMP: &str = "%Y-%m-%dT%H:%M:%S%.3f%z";

// ============================================================================
// TimeSpent
// ============================================================================

/// A validated Jira duration such as `"2h"`, `"1w 2d"`, or `"1h30m"`.
///
/// A bare number is read as minutes. Zero and negative durations are rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSpent {
    raw: String,
    seconds: i64,
}

impl TimeSpent {
    /// The duration exactly as the caller wrote it (trimmed).
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    fn parse_seconds(input: &str) -> Option<i64> {
        if !input.is_empty() && input.chars().all(|c| c.is_ascii_digit() || c == '.') {
            let minutes: f64 = input.parse().ok()?;
            let seconds = (minutes * MINUTE).round() as i64;
            return (seconds > 0).then_some(seconds);
        }

        let mut total = 0.0;
        let mut number = String::new();
        let mut seen = Vec::with_capacity(4);
        for ch in input.chars() {
            if ch.is_ascii_digit() || ch == '.' {
                number.push(ch);
            } else if ch.is_whitespace() {
                // A number must be followed directly by its unit
                if !number.is_empty() {
                    return None;
                }
            } else {
                let symbol = ch.to_ascii_lowercase();
                let unit = match symbol {
                    'w' => WEEK,
                    'd' => DAY,
                    'h' => HOUR,
                    'm' => MINUTE,
                    _ => return None,
                };
                // Each unit at most once
                if seen.contains(&symbol) {
                    return None;
                }
                seen.push(symbol);
                let value: f64 = number.parse().ok()?;
                number.clear();
                total += value * unit;
            }
        }
        if !number.is_empty() {
            return None;
        }

        let seconds = total.round() as i64;
        (seconds > 0).then_some(seconds)
    }
}

impl FromStr for TimeSpent {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        match Self::parse_seconds(raw) {
            Some(seconds) => Ok(Self {
                raw: raw.to_string(),
                seconds,
            }),
            None => Err(AppError::Validation(format!(
                "invalid time_spent '{}': expected a positive Jira duration like '2h', '1d 4h' or '30m'",
                s
            ))),
        }
    }
}

impl fmt::Display for TimeSpent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// ============================================================================
// IssueKey
// ============================================================================

/// A Jira issue key (`PROJ-123`) split into its project prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueKey {
    key: String,
    project_len: usize,
}

impl IssueKey {
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// The project key prefix, e.g. `PROJ` for `PROJ-123`.
    pub fn project_key(&self) -> &str {
        &self.key[..self.project_len]
    }
}

impl FromStr for IssueKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase();
        let invalid = || {
            AppError::Validation(format!("invalid issue key '{}': expected PROJECT-123", s))
        };

        let (project, number) = key.rsplit_once('-').ok_or_else(invalid)?;
        let project_ok = project
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && project.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        let number_ok = !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
        if !project_ok || !number_ok {
            return Err(invalid());
        }

        let project_len = project.len();
        Ok(Self { key, project_len })
    }
}

impl fmt::Display for IssueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Normalize a caller-supplied start time to Jira's timestamp layout.
///
/// Accepts RFC 3339 (`2024-01-01T09:00:00Z`) and Jira's own layout
/// (`2024-01-01T09:00:00.000+0000`).
pub fn format_started(input: &str) -> Result<String, AppError> {
    let trimmed = input.trim();
    DateTime::parse_from_rfc3339(trimmed)
        .or_else(|_| DateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .map(|dt| dt.format(JIRA_TIMESTAMP).to_string())
        .map_err(|_| {
            AppError::Validation(format!(
                "invalid started '{}': expected an RFC 3339 timestamp like 2024-01-01T09:00:00Z",
                input
            ))
        })
}

// ============================================================================
// Jira request / response
// ============================================================================

/// Worklog creation request body for `POST /rest/api/2/issue/{key}/worklog`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorklog {
    /// Target issue; part of the URL, not the body.
    #[serde(skip)]
    pub issue_key: String,
    pub time_spent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
}

/// Worklog author as reported by Jira.
///
/// Cloud reports `accountId`; Server/Data Center reports `name`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorklogAuthor {
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// A worklog as returned by Jira after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    pub id: String,
    #[serde(default)]
    pub time_spent: Option<String>,
    #[serde(default)]
    pub time_spent_seconds: Option<i64>,
    #[serde(default)]
    pub started: Option<String>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub author: Option<WorklogAuthor>,
}

// ============================================================================
// TimeLogEntry
// ============================================================================

/// Normalized result of a successful `log_time` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeLogEntry {
    pub account_id: String,
    pub account_name: String,
    pub issue_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    pub time_spent: String,
    pub time_spent_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started: Option<String>,
    pub worklog_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl TimeLogEntry {
    /// Combine the validated request with Jira's response.
    ///
    /// Jira's own values win where present; the request fills the gaps.
    pub fn from_worklog(
        account_id: &str,
        account_name: &str,
        project_key: Option<String>,
        request: &NewWorklog,
        time_spent: &TimeSpent,
        worklog: Worklog,
    ) -> Self {
        let author = worklog
            .author
            .and_then(|a| a.display_name.or(a.account_id).or(a.name));

        Self {
            account_id: account_id.to_string(),
            account_name: account_name.to_string(),
            issue_key: request.issue_key.clone(),
            project_key,
            time_spent: worklog
                .time_spent
                .unwrap_or_else(|| time_spent.as_str().to_string()),
            time_spent_seconds: worklog
                .time_spent_seconds
                .unwrap_or_else(|| time_spent.seconds()),
            description: request.comment.clone(),
            started: worklog.started.or_else(|| request.started.clone()),
            worklog_id: worklog.id,
            created: worklog.created,
            author,
        }
    }
}
