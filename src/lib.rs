//! Jira Accounts - account-based access to Jira projects
//!
//! Groups Jira projects into named accounts configured through
//! `ACCOUNT_MAPPINGS` and exposes them over MCP for listing, project
//! resolution, and account-scoped time logging.

pub mod cli;
pub mod config;
pub mod context;
pub mod di;
pub mod error;
pub mod mappings;
pub mod mcp;
pub mod models;
pub mod repositories;
pub mod services;
pub mod tracker;

#[cfg(test)]
pub(crate) mod test_utils;

pub use di::FromRef;
