//! Parser for the `ACCOUNT_MAPPINGS` string.
//!
//! Format: `id1:KEY1,KEY2;id2:KEY3`
//!
//! - Segments are separated by `;`, the id from its keys by the first `:`,
//!   and keys by `,`.
//! - Blank input yields the single default account.
//! - Blank segments and blank keys carry no data and are skipped.
//! - Keys are upper-cased and de-duplicated, keeping first occurrence.
//! - A segment without `:`, with an empty id, or repeating an earlier id is
//!   a configuration error. Nothing is silently dropped.

use crate::config::AccountsConfig;
use crate::error::AppError;
use crate::models::Account;

/// Parse a mapping string into accounts, in configured order.
pub fn parse_account_mappings(input: &str) -> Result<Vec<Account>, AppError> {
    if input.trim().is_empty() {
        tracing::info!("No account mappings configured, using default account");
        return Ok(vec![Account::default_account()]);
    }

    let mut accounts: Vec<Account> = Vec::new();

    for (index, segment) in input.split(';').enumerate() {
        if segment.trim().is_empty() {
            continue;
        }

        let (id, keys) = segment.split_once(':').ok_or_else(|| {
            AppError::Mapping(format!(
                "account mapping segment {} ('{}') is missing ':' between account id and project keys",
                index + 1,
                segment.trim()
            ))
        })?;

        let id = id.trim();
        if id.is_empty() {
            return Err(AppError::Mapping(format!(
                "account mapping segment {} ('{}') has an empty account id",
                index + 1,
                segment.trim()
            )));
        }

        if accounts.iter().any(|a| a.id == id) {
            return Err(AppError::Mapping(format!(
                "account '{}' is mapped more than once",
                id
            )));
        }

        let project_keys = parse_project_keys(keys);
        if project_keys.is_empty() {
            tracing::warn!(account_id = %id, "Account mapping has no project keys");
        }

        accounts.push(Account::new(id, project_keys));
    }

    if accounts.is_empty() {
        tracing::info!("Account mappings contained no segments, using default account");
        return Ok(vec![Account::default_account()]);
    }

    tracing::info!(count = accounts.len(), "Loaded accounts from mappings");
    Ok(accounts)
}

fn parse_project_keys(list: &str) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for key in list.split(',') {
        let key = key.trim().to_uppercase();
        if !key.is_empty() && !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Build the account table from config: parse `mappings`, then apply the
/// name, description, and inactive overlays.
pub fn load_accounts(config: &AccountsConfig) -> Result<Vec<Account>, AppError> {
    let mut accounts = parse_account_mappings(config.mappings.as_deref().unwrap_or(""))?;

    let unknown = |id: &str, what: &str| {
        AppError::Mapping(format!(
            "accounts.{} references unknown account '{}'",
            what, id
        ))
    };

    for (id, name) in &config.names {
        let account = find_mut(&mut accounts, id).ok_or_else(|| unknown(id, "names"))?;
        account.name = name.clone();
    }

    for (id, description) in &config.descriptions {
        let account = find_mut(&mut accounts, id).ok_or_else(|| unknown(id, "descriptions"))?;
        account.description = Some(description.clone());
    }

    for id in &config.inactive {
        let account = find_mut(&mut accounts, id).ok_or_else(|| unknown(id, "inactive"))?;
        account.is_active = false;
    }

    Ok(accounts)
}

fn find_mut<'a>(accounts: &'a mut [Account], id: &str) -> Option<&'a mut Account> {
    accounts.iter_mut().find(|a| a.id == id)
}
