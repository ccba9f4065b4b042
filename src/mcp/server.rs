//! MCP server implementation.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, ServerHandler},
    model::{Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool_handler,
};

use crate::context::Context;
use crate::di::FromRef;

/// MCP server exposing Jira projects grouped into accounts.
///
/// This server provides AI assistants with tools to:
/// - List the configured accounts
/// - Resolve the Jira projects that belong to an account
/// - Log time against an account, scoped to its projects
#[derive(Clone)]
pub struct McpServer {
    pub(crate) ctx: Arc<Context>,
    tool_router: ToolRouter<McpServer>,
}

impl McpServer {
    pub fn new(ctx: Context) -> Self {
        tracing::info!(
            accounts = ctx.accounts.len(),
            read_only = ctx.config.server.read_only,
            "Initializing Jira accounts MCP server"
        );

        Self {
            ctx: Arc::new(ctx),
            tool_router: Self::tool_router(),
        }
    }

    /// Build the combined tool router from all tool modules.
    fn tool_router() -> ToolRouter<Self> {
        Self::account_tools() + Self::timelog_tools()
    }

    /// Resolve a service from the context.
    pub fn resolve<T: FromRef<Context>>(&self) -> T {
        T::from_ref(&self.ctx)
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                r#"Jira Accounts - account-based access to Jira projects

An account is a named group of Jira project keys, configured with
ACCOUNT_MAPPINGS="team-alpha:PROJ,DEV;team-beta:SUPPORT". Without a mapping a
single "default" account covers every visible project.

## Account Tools

- **list_accounts** - List accounts (optional search_filter on id or name)
- **get_account_projects** - Jira projects belonging to an account
- **get_account_summary** - Account metadata, projects, and configured keys Jira does not return

## Time Tools

- **log_time** - Log time to an issue within one of the account's projects

Every response carries `success`; failures include an `error` message.
"#
                .to_string(),
            ),
        }
    }
}
