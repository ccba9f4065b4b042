//! MCP server command handler.

use color_eyre::{eyre::eyre, Result};
use rmcp::ServiceExt;

use crate::context::Context;
use crate::mcp::McpServer;

use super::App;

impl App {
    /// Serve the account tools over stdin/stdout until the client disconnects.
    pub async fn run_mcp(&self) -> Result<()> {
        let ctx = Context::load()?;

        let ids: Vec<&str> = ctx.accounts.all().iter().map(|a| a.id.as_str()).collect();
        tracing::info!(
            accounts = ?ids,
            jira_url = %ctx.config.jira.url.as_deref().unwrap_or_default(),
            read_only = ctx.config.server.read_only,
            "Starting Jira accounts MCP server"
        );
        if ctx.config.server.read_only {
            tracing::warn!("Read-only mode: log_time will reject every request");
        }

        let running = McpServer::new(ctx)
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| eyre!("Failed to start MCP server on stdio: {}", e))?;

        let reason = running
            .waiting()
            .await
            .map_err(|e| eyre!("MCP server stopped with error: {}", e))?;

        tracing::info!(reason = ?reason, "MCP server shut down");
        Ok(())
    }
}
