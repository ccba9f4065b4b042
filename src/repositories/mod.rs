//! Data access layer for the account table.
//!
//! The table is parsed once at startup and shared read-only, so lookups
//! never lock.

mod account;

pub use account::AccountRepository;
