//! MCP tool implementations organized by domain.

pub mod account;
pub mod timelog;
