//! Time logging tool.

use rmcp::{
    handler::server::wrapper::Parameters,
    model::CallToolResult,
    schemars::{self, JsonSchema},
    tool, tool_router, ErrorData as McpError,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::mcp::protocol::{Envelope, OutputFormat};
use crate::mcp::server::McpServer;
use crate::models::TimeLogEntry;
use crate::services::{LogTimeRequest, TimeLogService};

/// Parameters for log_time tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct LogTimeParams {
    /// Account id to log against (e.g., "team-alpha").
    pub account_id: String,

    /// Time spent in Jira format (e.g., "2h", "1d 4h", "30m"). A bare number is minutes.
    pub time_spent: String,

    /// Issue to attach the worklog to (e.g., "PROJ-123"). Must belong to one of the account's projects.
    #[serde(default)]
    pub issue_key: Option<String>,

    /// Optional project key; when given it must belong to the account and match the issue.
    #[serde(default, alias = "project_key")]
    pub project_id: Option<String>,

    /// Work description, stored as the worklog comment.
    #[serde(default)]
    pub description: Option<String>,

    /// When the work started (RFC 3339). Defaults to now.
    #[serde(default)]
    pub started: Option<String>,

    /// Response format: json (default) or toon.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl From<LogTimeParams> for LogTimeRequest {
    fn from(params: LogTimeParams) -> Self {
        Self {
            account_id: params.account_id,
            time_spent: params.time_spent,
            issue_key: params.issue_key,
            project_id: params.project_id,
            description: params.description,
            started: params.started,
        }
    }
}

/// Response for log_time tool.
#[derive(Debug, Serialize)]
pub struct LogTimeResult {
    pub message: String,
    #[serde(flatten)]
    pub entry: TimeLogEntry,
}

#[tool_router(router = timelog_tools, vis = "pub(crate)")]
impl McpServer {
    /// Log time against an account.
    ///
    /// Validation happens locally; nothing reaches Jira unless the issue
    /// belongs to the account.
    #[tool(
        description = "Log time to an account. The issue must belong to one of the account's projects. Disabled in read-only mode."
    )]
    pub async fn log_time(
        &self,
        Parameters(params): Parameters<LogTimeParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(
            account_id = %params.account_id,
            issue_key = ?params.issue_key,
            time_spent = %params.time_spent,
            "Running log_time tool"
        );

        let format = params.format;
        Envelope::new(self.handle_log_time(params).await, format).into()
    }
}

impl McpServer {
    pub(crate) async fn handle_log_time(
        &self,
        params: LogTimeParams,
    ) -> Result<LogTimeResult, AppError> {
        let service = self.resolve::<TimeLogService>();
        let entry = service.log_time(params.into()).await?;

        Ok(LogTimeResult {
            message: format!("Time logged successfully to account {}", entry.account_id),
            entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{context, sample_projects};
    use crate::tracker::MockTracker;
    use serde_json::json;

    const MAPPING: &str = "team-alpha:PROJ,DEV;team-beta:SUPPORT";

    fn params(value: serde_json::Value) -> LogTimeParams {
        serde_json::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_log_time_success_envelope() {
        let tracker = MockTracker::new(sample_projects());
        let server = McpServer::new(context(MAPPING, &tracker, None, false));

        let result = server
            .handle_log_time(params(json!({
                "account_id": "team-alpha",
                "time_spent": "2h",
                "issue_key": "PROJ-123",
                "project_id": "PROJ",
                "description": "Development work"
            })))
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(value["success"], json!(true));
        assert_eq!(
            value["message"],
            json!("Time logged successfully to account team-alpha")
        );
        assert_eq!(value["account_id"], json!("team-alpha"));
        assert_eq!(value["issue_key"], json!("PROJ-123"));
        assert_eq!(value["time_spent_seconds"], json!(7200));
        assert!(value["worklog_id"].is_string());
    }

    #[test]
    fn test_project_key_alias_accepted() {
        let p = params(json!({
            "account_id": "team-alpha",
            "time_spent": "1h",
            "project_key": "DEV"
        }));
        assert_eq!(p.project_id.as_deref(), Some("DEV"));
    }

    #[tokio::test]
    async fn test_project_access_denied_envelope() {
        let tracker = MockTracker::new(sample_projects());
        let server = McpServer::new(context(MAPPING, &tracker, None, false));

        let result = server
            .handle_log_time(params(json!({
                "account_id": "team-alpha",
                "time_spent": "2h",
                "issue_key": "SUPPORT-1",
                "project_id": "SUPPORT"
            })))
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "Project 'SUPPORT' is not associated with account 'team-alpha'"
            })
        );
        assert!(tracker.calls().is_empty());
    }

    #[tokio::test]
    async fn test_read_only_envelope() {
        let tracker = MockTracker::new(sample_projects());
        let server = McpServer::new(context(MAPPING, &tracker, None, true));

        let result = server
            .handle_log_time(params(json!({
                "account_id": "team-alpha",
                "time_spent": "2h",
                "issue_key": "PROJ-1"
            })))
            .await;
        let envelope = Envelope::new(result, None);

        assert!(!envelope.is_success());
        assert_eq!(
            envelope.to_value().unwrap()["error"],
            json!("Read-only mode: log_time is disabled")
        );
    }
}
