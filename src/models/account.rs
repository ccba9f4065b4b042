//! Account model grouping Jira projects.

use serde::Serialize;

/// Id of the account synthesized when no mapping is configured.
pub const DEFAULT_ACCOUNT_ID: &str = "default";

/// Display name of the synthesized default account.
pub const DEFAULT_ACCOUNT_NAME: &str = "Default Account";

/// The projects an account covers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectSet {
    /// Explicit project keys, upper-cased, de-duplicated, in configured order.
    Keys(Vec<String>),
    /// Every project visible in the tracker, resolved at call time.
    AllVisible,
}

/// A logical grouping of Jira projects for time reporting.
///
/// Accounts are built once from configuration and never change while the
/// process runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub id: String,
    /// Display name; the id unless overridden in config.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_active: bool,
    pub projects: ProjectSet,
}

impl Account {
    /// Creates an active account named after its id.
    pub fn new(id: impl Into<String>, project_keys: Vec<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            description: None,
            is_active: true,
            projects: ProjectSet::Keys(project_keys),
        }
    }

    /// The account used when `ACCOUNT_MAPPINGS` is unset or empty.
    pub fn default_account() -> Self {
        Self {
            id: DEFAULT_ACCOUNT_ID.to_string(),
            name: DEFAULT_ACCOUNT_NAME.to_string(),
            description: Some("Default account containing all available projects".to_string()),
            is_active: true,
            projects: ProjectSet::AllVisible,
        }
    }

    pub fn is_default(&self) -> bool {
        self.projects == ProjectSet::AllVisible
    }

    /// Configured keys, or `None` for the default account.
    pub fn project_keys(&self) -> Option<&[String]> {
        match &self.projects {
            ProjectSet::Keys(keys) => Some(keys),
            ProjectSet::AllVisible => None,
        }
    }

    /// Whether `key` belongs to this account.
    ///
    /// For the default account membership is decided by the projects filter:
    /// with no filter every key belongs (the tracker has the final word).
    pub fn includes_project(&self, key: &str, visible_filter: Option<&[String]>) -> bool {
        match &self.projects {
            ProjectSet::Keys(keys) => keys.iter().any(|k| k.eq_ignore_ascii_case(key)),
            ProjectSet::AllVisible => visible_filter
                .map(|filter| filter.iter().any(|k| k.eq_ignore_ascii_case(key)))
                .unwrap_or(true),
        }
    }

    /// Case-insensitive substring match on id or name.
    pub fn matches(&self, search: &str) -> bool {
        let needle = search.to_lowercase();
        self.id.to_lowercase().contains(&needle) || self.name.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_account_defaults_name_to_id() {
        let account = Account::new("team-alpha", keys(&["PROJ"]));
        assert_eq!(account.name, "team-alpha");
        assert!(account.is_active);
        assert!(!account.is_default());
        assert_eq!(account.project_keys(), Some(&keys(&["PROJ"])[..]));
    }

    #[test]
    fn test_default_account() {
        let account = Account::default_account();
        assert_eq!(account.id, DEFAULT_ACCOUNT_ID);
        assert_eq!(account.name, DEFAULT_ACCOUNT_NAME);
        assert!(account.is_default());
        assert!(account.project_keys().is_none());
    }

    #[test]
    fn test_includes_project_explicit_keys() {
        let account = Account::new("a", keys(&["PROJ", "DEV"]));
        assert!(account.includes_project("PROJ", None));
        assert!(account.includes_project("dev", None));
        assert!(!account.includes_project("OPS", None));
    }

    #[test]
    fn test_includes_project_default_uses_filter() {
        let account = Account::default_account();
        assert!(account.includes_project("ANY", None));

        let filter = keys(&["PROJ"]);
        assert!(account.includes_project("proj", Some(&filter)));
        assert!(!account.includes_project("ANY", Some(&filter)));
    }

    #[test]
    fn test_matches_id_or_name_case_insensitive() {
        let mut account = Account::new("team-alpha", vec![]);
        account.name = "Alpha Squad".to_string();
        assert!(account.matches("TEAM"));
        assert!(account.matches("squad"));
        assert!(!account.matches("beta"));
    }
}
