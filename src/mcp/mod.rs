//! Model Context Protocol (MCP) server for account-based Jira access.
//!
//! ## Architecture
//!
//! The server holds a shared `Context`. Services are resolved per tool call
//! using `FromRef`, so tools never touch configuration or the tracker
//! directly.
//!
//! ## Modules
//!
//! - `server`: MCP server implementation with tool router
//! - `protocol`: `success`/`error` response envelope and output formats
//! - `tools`: Tool implementations organized by domain

pub(crate) mod protocol;
pub(crate) mod server;
mod tools;

pub use protocol::OutputFormat;
pub use server::McpServer;
pub use tools::account::{GetAccountProjectsParams, GetAccountSummaryParams, ListAccountsParams};
pub use tools::timelog::LogTimeParams;
