//! Configuration with layered resolution using figment.
//!
//! Resolution order (highest priority last):
//! 1. User config: `~/.config/jira-accounts/config.toml` (XDG) or platform config dir
//! 2. Project config: `.jira-accounts.toml`
//! 3. Prefixed environment variables: `JIRA_ACCOUNTS_*` (nested with `__`)
//! 4. Well-known environment variables: `ACCOUNT_MAPPINGS`, `JIRA_URL`, ...
//!
//! # Intended Usage
//!
//! **Global config** (`~/.config/jira-accounts/config.toml`):
//! ```toml
//! [jira]
//! url = "https://your-company.atlassian.net"
//! username = "you@example.com"
//! api_token = "..."
//! ```
//!
//! **Project config** (`.jira-accounts.toml`):
//! ```toml
//! [accounts]
//! mappings = "team-alpha:PROJ,DEV;client-work:CLIENT1"
//! inactive = ["client-work"]
//!
//! [accounts.names]
//! team-alpha = "Team Alpha"
//! ```
//!
//! The environment always wins, so `ACCOUNT_MAPPINGS=...` overrides a mapping
//! written in either file.

use std::collections::BTreeMap;
use std::ops::Deref;

use figment::{
    providers::{Env, Format, Toml},
    value::Uncased,
    Figment,
};
use serde::{Deserialize, Deserializer};

/// Boxed wrapper for figment::Error to reduce Result size on the stack.
#[derive(Debug)]
pub struct ConfigError(Box<figment::Error>);

impl Deref for ConfigError {
    type Target = figment::Error;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self(Box::new(err))
    }
}

/// Well-known environment variables and the config keys they populate.
const ENV_ALIASES: &[(&str, &str)] = &[
    ("ACCOUNT_MAPPINGS", "accounts.mappings"),
    ("JIRA_PROJECTS_FILTER", "jira.projects_filter"),
    ("READ_ONLY_MODE", "server.read_only"),
    ("JIRA_URL", "jira.url"),
    ("JIRA_USERNAME", "jira.username"),
    ("JIRA_API_TOKEN", "jira.api_token"),
    ("JIRA_PERSONAL_TOKEN", "jira.personal_token"),
    ("JIRA_SSL_VERIFY", "jira.ssl_verify"),
    ("JIRA_TIMEOUT", "jira.timeout_secs"),
];

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub jira: JiraConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Jira connection settings.
///
/// Cloud instances authenticate with `username` + `api_token` (basic auth);
/// Server/Data Center instances with a `personal_token` (bearer).
#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
    /// Base URL, e.g. `https://your-company.atlassian.net`.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default)]
    pub personal_token: Option<String>,
    /// Comma-separated project keys restricting which projects are visible.
    #[serde(default)]
    pub projects_filter: Option<String>,
    #[serde(default = "default_ssl_verify", deserialize_with = "deserialize_flag")]
    pub ssl_verify: bool,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            api_token: None,
            personal_token: None,
            projects_filter: None,
            ssl_verify: default_ssl_verify(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Accept the usual environment spellings of a boolean:
/// `true/false`, `1/0`, `yes/no`, `on/off` (any case).
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    let invalid = |value: &dyn std::fmt::Display| {
        serde::de::Error::custom(format!(
            "invalid boolean '{}': expected true/false, 1/0, yes/no or on/off",
            value
        ))
    };

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(1) => Ok(true),
        Flag::Int(0) => Ok(false),
        Flag::Int(n) => Err(invalid(&n)),
        Flag::Str(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" | "on" => Ok(true),
            "false" | "0" | "no" | "n" | "off" | "" => Ok(false),
            _ => Err(invalid(&s)),
        },
    }
}

fn default_ssl_verify() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl JiraConfig {
    /// Parsed `projects_filter`: upper-cased keys, or `None` when unset or empty.
    pub fn project_filter_keys(&self) -> Option<Vec<String>> {
        let raw = self.projects_filter.as_deref()?;
        let keys: Vec<String> = raw
            .split(',')
            .map(|k| k.trim().to_uppercase())
            .filter(|k| !k.is_empty())
            .collect();
        if keys.is_empty() {
            None
        } else {
            Some(keys)
        }
    }
}

/// Account table settings.
///
/// `mappings` is the source of truth for which accounts exist; the maps
/// below only decorate accounts it defines.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountsConfig {
    /// `id1:KEY1,KEY2;id2:KEY3`. Unset or empty yields the default account.
    #[serde(default)]
    pub mappings: Option<String>,
    /// Display name overrides keyed by account id.
    #[serde(default)]
    pub names: BTreeMap<String, String>,
    /// Descriptions keyed by account id.
    #[serde(default)]
    pub descriptions: BTreeMap<String, String>,
    /// Account ids that exist but refuse time logging.
    #[serde(default)]
    pub inactive: Vec<String>,
}

/// Server behaviour switches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfig {
    /// Disable every tool that writes to Jira.
    #[serde(default, deserialize_with = "deserialize_flag")]
    pub read_only: bool,
}

impl Config {
    /// Load config with layered resolution (user → project → env).
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment(Self::user_config_path())
            .extract()
            .map_err(ConfigError::from)
    }

    fn figment(user_config: std::path::PathBuf) -> Figment {
        Figment::new()
            // Layer 1: User config (lowest priority)
            .merge(Toml::file(user_config))
            // Layer 2: Project config
            .merge(Toml::file(".jira-accounts.toml"))
            // Layer 3: Prefixed environment variables
            .merge(Env::prefixed("JIRA_ACCOUNTS_").split("__"))
            // Layer 4: Well-known variables (highest priority)
            .merge(Self::env_aliases())
    }

    fn env_aliases() -> Env {
        let names: Vec<&str> = ENV_ALIASES.iter().map(|(name, _)| *name).collect();
        Env::raw().only(&names).map(|key| {
            ENV_ALIASES
                .iter()
                .find(|(name, _)| key.as_str().eq_ignore_ascii_case(name))
                .map(|(_, path)| Uncased::from(*path))
                .unwrap_or_else(|| Uncased::from(key.as_str().to_owned()))
        })
    }

    /// User config path: ~/.config/jira-accounts/config.toml (XDG) or platform config dir.
    fn user_config_path() -> std::path::PathBuf {
        // Prefer XDG config location (~/.config) on all platforms
        if let Some(home) = dirs::home_dir() {
            let xdg_path = home
                .join(".config")
                .join("jira-accounts")
                .join("config.toml");
            if xdg_path.exists() {
                return xdg_path;
            }
        }
        // Fall back to platform-specific config dir
        dirs::config_dir()
            .map(|p| p.join("jira-accounts").join("config.toml"))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn load_in(jail: &Jail) -> Result<Config, figment::Error> {
        Config::figment(jail.directory().join("no-user-config.toml")).extract()
    }

    #[test]
    fn test_empty_environment_loads_defaults() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let config = load_in(jail)?;
            assert!(config.accounts.mappings.is_none());
            assert!(config.jira.url.is_none());
            assert!(config.jira.ssl_verify);
            assert_eq!(config.jira.timeout_secs, 30);
            assert!(!config.server.read_only);
            Ok(())
        });
    }

    #[test]
    fn test_well_known_env_vars() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("ACCOUNT_MAPPINGS", "a:X,Y;b:Z");
            jail.set_env("JIRA_PROJECTS_FILTER", "X,Z");
            jail.set_env("READ_ONLY_MODE", "true");
            jail.set_env("JIRA_URL", "https://jira.example.com");
            let config = load_in(jail)?;
            assert_eq!(config.accounts.mappings.as_deref(), Some("a:X,Y;b:Z"));
            assert_eq!(config.jira.projects_filter.as_deref(), Some("X,Z"));
            assert!(config.server.read_only);
            assert_eq!(config.jira.url.as_deref(), Some("https://jira.example.com"));
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                ".jira-accounts.toml",
                r#"
                [accounts]
                mappings = "file:ONE"
                inactive = ["file"]

                [accounts.names]
                file = "From File"
                "#,
            )?;
            let config = load_in(jail)?;
            assert_eq!(config.accounts.mappings.as_deref(), Some("file:ONE"));
            assert_eq!(config.accounts.names.get("file").map(String::as_str), Some("From File"));
            assert_eq!(config.accounts.inactive, vec!["file".to_string()]);

            jail.set_env("ACCOUNT_MAPPINGS", "env:TWO");
            let config = load_in(jail)?;
            assert_eq!(config.accounts.mappings.as_deref(), Some("env:TWO"));
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_env_nests_on_double_underscore() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("JIRA_ACCOUNTS_JIRA__TIMEOUT_SECS", "5");
            let config = load_in(jail)?;
            assert_eq!(config.jira.timeout_secs, 5);
            Ok(())
        });
    }

    #[test]
    fn test_boolean_env_spellings() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let cases = [("1", true), ("yes", true), ("ON", true), ("0", false), ("off", false)];
            for (value, expected) in cases {
                jail.set_env("READ_ONLY_MODE", value);
                jail.set_env("JIRA_SSL_VERIFY", value);
                let config = load_in(jail)?;
                assert_eq!(config.server.read_only, expected, "READ_ONLY_MODE={}", value);
                assert_eq!(config.jira.ssl_verify, expected, "JIRA_SSL_VERIFY={}", value);
            }
            Ok(())
        });
    }

    #[test]
    fn test_unrecognized_boolean_fails() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.set_env("READ_ONLY_MODE", "maybe");
            let err = load_in(jail).unwrap_err();
            assert!(err.to_string().contains("invalid boolean 'maybe'"));
            Ok(())
        });
    }

    #[test]
    fn test_project_filter_keys() {
        let mut jira = JiraConfig::default();
        assert!(jira.project_filter_keys().is_none());

        jira.projects_filter = Some(" , ".to_string());
        assert!(jira.project_filter_keys().is_none());

        jira.projects_filter = Some("proj, dev ,,OPS".to_string());
        assert_eq!(
            jira.project_filter_keys(),
            Some(vec!["PROJ".to_string(), "DEV".to_string(), "OPS".to_string()])
        );
    }
}
