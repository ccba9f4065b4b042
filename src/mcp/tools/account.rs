//! Account tools - listing, project resolution, and summaries.

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
use crate::models::Project;
use crate::services::{AccountProjects, AccountService, AccountSummary, ResolvedAccount};

// ============================================================================
// Parameter Types
// ============================================================================

/// Parameters for list_accounts tool.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListAccountsParams {
    /// Only return accounts whose id or name contains this text (case-insensitive).
    #[serde(default)]
    pub search_filter: Option<String>,

    /// Response format: json (default) or toon.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Parameters for get_account_projects tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetAccountProjectsParams {
    /// Account id as configured in ACCOUNT_MAPPINGS (e.g., "team-alpha").
    pub account_id: String,

    /// Response format: json (default) or toon.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

/// Parameters for get_account_summary tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetAccountSummaryParams {
    /// Account id as configured in ACCOUNT_MAPPINGS.
    pub account_id: String,
}

// ============================================================================
// Response Types
// ============================================================================

/// Account information.
#[derive(Debug, Serialize)]
pub struct AccountResult {
    pub id: String,
    pub name: String,
    pub is_active: bool,
    pub project_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_keys: Vec<String>,
}

impl From<ResolvedAccount> for AccountResult {
    fn from(resolved: ResolvedAccount) -> Self {
        Self {
            id: resolved.account.id,
            name: resolved.account.name,
            is_active: resolved.account.is_active,
            project_count: resolved.project_keys.len(),
            description: resolved.account.description,
            project_keys: resolved.project_keys,
        }
    }
}

/// Response for list_accounts tool.
#[derive(Debug, Serialize)]
pub struct ListAccountsResult {
    pub accounts: Vec<AccountResult>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Vec<ResolvedAccount>> for ListAccountsResult {
    fn from(accounts: Vec<ResolvedAccount>) -> Self {
        let accounts: Vec<AccountResult> = accounts.into_iter().map(Into::into).collect();
        Self {
            count: accounts.len(),
            message: accounts
                .is_empty()
                .then(|| "No accounts found".to_string()),
            accounts,
        }
    }
}

/// Response for get_account_projects tool.
#[derive(Debug, Serialize)]
pub struct AccountProjectsResult {
    pub account_id: String,
    pub account_name: String,
    pub projects: Vec<Project>,
    pub count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<AccountProjects> for AccountProjectsResult {
    fn from(result: AccountProjects) -> Self {
        let message = result
            .projects
            .is_empty()
            .then(|| format!("No projects found for account '{}'", result.account.id));
        Self {
            account_id: result.account.id,
            account_name: result.account.name,
            count: result.projects.len(),
            projects: result.projects,
            message,
        }
    }
}

/// Response for get_account_summary tool.
#[derive(Debug, Serialize)]
pub struct AccountSummaryResult {
    pub account_id: String,
    pub account_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub project_count: usize,
    pub projects: Vec<Project>,
    /// Configured keys Jira does not return (typo, archived, or no access).
    pub missing_project_keys: Vec<String>,
}

impl From<AccountSummary> for AccountSummaryResult {
    fn from(summary: AccountSummary) -> Self {
        Self {
            account_id: summary.account.id,
            account_name: summary.account.name,
            description: summary.account.description,
            is_active: summary.account.is_active,
            project_count: summary.projects.len(),
            projects: summary.projects,
            missing_project_keys: summary.missing_project_keys,
        }
    }
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router(router = account_tools, vis = "pub(crate)")]
impl McpServer {
    /// List configured accounts.
    ///
    /// Accounts come from ACCOUNT_MAPPINGS. When no mapping is configured a
    /// single "default" account covering every visible project is returned.
    #[tool(
        description = "List accounts (groups of Jira projects). Optional search_filter matches account id or name, case-insensitive."
    )]
    pub async fn list_accounts(
        &self,
        Parameters(params): Parameters<ListAccountsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(filter = ?params.search_filter, "Running list_accounts tool");

        let format = params.format;
        Envelope::new(self.handle_list_accounts(params).await, format).into()
    }

    /// Get the Jira projects that belong to an account.
    #[tool(description = "Get the Jira projects associated with an account.")]
    pub async fn get_account_projects(
        &self,
        Parameters(params): Parameters<GetAccountProjectsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(account_id = %params.account_id, "Running get_account_projects tool");

        let format = params.format;
        Envelope::new(self.handle_get_account_projects(params).await, format).into()
    }

    /// Get account metadata, its projects, and configured keys that Jira
    /// does not return.
    #[tool(
        description = "Get an account summary: metadata, projects, and configured project keys missing from Jira."
    )]
    pub async fn get_account_summary(
        &self,
        Parameters(params): Parameters<GetAccountSummaryParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::info!(account_id = %params.account_id, "Running get_account_summary tool");

        Envelope::new(self.handle_get_account_summary(params).await, None).into()
    }
}

// ============================================================================
// Handlers
// ============================================================================

impl McpServer {
    pub(crate) async fn handle_list_accounts(
        &self,
        params: ListAccountsParams,
    ) -> Result<ListAccountsResult, AppError> {
        let service = self.resolve::<AccountService>();
        let accounts = service
            .list_accounts(params.search_filter.as_deref())
            .await?;

        tracing::info!(count = accounts.len(), "Listed accounts");
        Ok(accounts.into())
    }

    pub(crate) async fn handle_get_account_projects(
        &self,
        params: GetAccountProjectsParams,
    ) -> Result<AccountProjectsResult, AppError> {
        let service = self.resolve::<AccountService>();
        let result = service.get_account_projects(params.account_id.trim()).await?;

        tracing::info!(
            account_id = %result.account.id,
            count = result.projects.len(),
            "Resolved account projects"
        );
        Ok(result.into())
    }

    pub(crate) async fn handle_get_account_summary(
        &self,
        params: GetAccountSummaryParams,
    ) -> Result<AccountSummaryResult, AppError> {
        let service = self.resolve::<AccountService>();
        let summary = service.get_account_summary(params.account_id.trim()).await?;
        Ok(summary.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{context, sample_projects};
    use crate::tracker::MockTracker;
    use serde_json::json;

    fn server(mapping: &str, tracker: &MockTracker) -> McpServer {
        McpServer::new(context(mapping, tracker, None, false))
    }

    #[tokio::test]
    async fn test_list_accounts_envelope() {
        let tracker = MockTracker::new(sample_projects());
        let server = server("team-alpha:PROJ,DEV;team-beta:SUPPORT", &tracker);

        let result = server
            .handle_list_accounts(ListAccountsParams::default())
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["count"], json!(2));
        assert_eq!(value["accounts"][0]["id"], json!("team-alpha"));
        assert_eq!(value["accounts"][0]["project_count"], json!(2));
        assert_eq!(value["accounts"][0]["project_keys"], json!(["PROJ", "DEV"]));
        assert!(value.get("message").is_none());
    }

    #[tokio::test]
    async fn test_list_accounts_empty_result_message() {
        let tracker = MockTracker::new(sample_projects());
        let server = server("team-alpha:PROJ", &tracker);

        let result = server
            .handle_list_accounts(ListAccountsParams {
                search_filter: Some("nobody".to_string()),
                format: None,
            })
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["accounts"], json!([]));
        assert_eq!(value["message"], json!("No accounts found"));
    }

    #[tokio::test]
    async fn test_get_account_projects_envelope() {
        let tracker = MockTracker::new(sample_projects());
        let server = server("team-alpha:PROJ,DEV", &tracker);

        let result = server
            .handle_get_account_projects(GetAccountProjectsParams {
                account_id: "team-alpha".to_string(),
                format: None,
            })
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(value["account_id"], json!("team-alpha"));
        assert_eq!(value["projects"][0]["key"], json!("PROJ"));
        assert_eq!(value["projects"][1]["name"], json!("Development Project"));
    }

    #[tokio::test]
    async fn test_get_account_projects_no_projects_message() {
        let tracker = MockTracker::new(sample_projects());
        let server = server("idle:NOTHING", &tracker);

        let result = server
            .handle_get_account_projects(GetAccountProjectsParams {
                account_id: "idle".to_string(),
                format: None,
            })
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(value["success"], json!(true));
        assert_eq!(value["message"], json!("No projects found for account 'idle'"));
    }

    #[tokio::test]
    async fn test_get_account_projects_unknown_account_envelope() {
        let tracker = MockTracker::new(sample_projects());
        let server = server("team-alpha:PROJ", &tracker);

        let result = server
            .handle_get_account_projects(GetAccountProjectsParams {
                account_id: "invalid-account".to_string(),
                format: None,
            })
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(
            value,
            json!({"success": false, "error": "Account 'invalid-account' not found"})
        );
    }

    #[tokio::test]
    async fn test_summary_envelope() {
        let tracker = MockTracker::new(sample_projects());
        let server = server("team-alpha:PROJ,GONE", &tracker);

        let result = server
            .handle_get_account_summary(GetAccountSummaryParams {
                account_id: "team-alpha".to_string(),
            })
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(value["project_count"], json!(1));
        assert_eq!(value["missing_project_keys"], json!(["GONE"]));
    }

    #[tokio::test]
    async fn test_tracker_authentication_failure_envelope() {
        let tracker = MockTracker::new(sample_projects())
            .failing_authentication("Client must be authenticated to access this resource.");
        let server = server("team-alpha:PROJ", &tracker);

        let result = server
            .handle_get_account_projects(GetAccountProjectsParams {
                account_id: "team-alpha".to_string(),
                format: None,
            })
            .await;
        let value = Envelope::new(result, None).to_value().unwrap();

        assert_eq!(
            value,
            json!({
                "success": false,
                "error": "Authentication failed: Client must be authenticated to access this resource."
            })
        );
    }
}
