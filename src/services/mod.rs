//! Business logic for account lookup and time logging.
//!
//! Services combine the account table with the tracker and enforce the
//! account rules, resolved from the context via `FromRef`.

mod account;
mod timelog;

pub use account::{AccountProjects, AccountService, AccountSummary, ResolvedAccount};
pub use timelog::{LogTimeRequest, TimeLogService};
