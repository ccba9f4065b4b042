//! Jira REST v2 client.
//!
//! Only the two calls this layer forwards are implemented:
//! `GET /rest/api/2/project` and `POST /rest/api/2/issue/{key}/worklog`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;

use super::IssueTracker;
use crate::config::JiraConfig;
use crate::error::AppError;
use crate::models::{NewWorklog, Project, Worklog};

/// How requests authenticate against Jira.
#[derive(Clone)]
enum Auth {
    /// Cloud: email + API token.
    Basic { username: String, token: String },
    /// Server/Data Center: personal access token.
    Bearer(String),
    Anonymous,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Auth::Basic { username, .. } => write!(f, "Basic({})", username),
            Auth::Bearer(_) => f.write_str("Bearer(..)"),
            Auth::Anonymous => f.write_str("Anonymous"),
        }
    }
}

/// Jira API client.
#[derive(Debug, Clone)]
pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    auth: Auth,
}

/// Error body Jira returns on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JiraErrorBody {
    #[serde(default)]
    error_messages: Vec<String>,
    #[serde(default)]
    errors: std::collections::BTreeMap<String, String>,
}

impl JiraClient {
    /// Build a client from config. Requires `jira.url`.
    ///
    /// A personal token takes precedence over username + API token.
    pub fn from_config(config: &JiraConfig) -> Result<Self, AppError> {
        let base_url = config
            .url
            .as_deref()
            .map(|u| u.trim().trim_end_matches('/'))
            .filter(|u| !u.is_empty())
            .ok_or(AppError::MissingSetting("jira.url (JIRA_URL)"))?
            .to_string();

        let auth = match (&config.personal_token, &config.username, &config.api_token) {
            (Some(token), _, _) => Auth::Bearer(token.clone()),
            (None, Some(username), Some(token)) => Auth::Basic {
                username: username.clone(),
                token: token.clone(),
            },
            _ => {
                tracing::warn!("No Jira credentials configured, requests will be anonymous");
                Auth::Anonymous
            }
        };

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()
            .map_err(|e| AppError::Network(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!(url = %base_url, auth = ?auth, "Configured Jira client");

        Ok(Self {
            client,
            base_url,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        match &self.auth {
            Auth::Basic { username, token } => builder.basic_auth(username, Some(token)),
            Auth::Bearer(token) => builder.bearer_auth(token),
            Auth::Anonymous => builder,
        }
    }

    /// Map non-2xx responses to errors carrying Jira's message.
    async fn check(response: Response) -> Result<Response, AppError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = Self::error_message(&body, status);

        Err(match status {
            StatusCode::UNAUTHORIZED => AppError::Authentication(message),
            StatusCode::FORBIDDEN => AppError::Permission(message),
            _ => AppError::Api {
                status: status.as_u16(),
                message,
            },
        })
    }

    fn error_message(body: &str, status: StatusCode) -> String {
        let parsed: JiraErrorBody = serde_json::from_str(body).unwrap_or_default();
        let mut parts = parsed.error_messages;
        parts.extend(
            parsed
                .errors
                .into_iter()
                .map(|(field, msg)| format!("{}: {}", field, msg)),
        );

        if !parts.is_empty() {
            parts.join("; ")
        } else if !body.trim().is_empty() {
            body.trim().to_string()
        } else {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        }
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn list_projects(&self) -> Result<Vec<Project>, AppError> {
        let response = self
            .request(Method::GET, "/rest/api/2/project")
            .query(&[("expand", "description")])
            .send()
            .await?;

        let projects: Vec<Project> = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Api {
                status: 200,
                message: format!("failed to parse project list: {}", e),
            })?;

        tracing::debug!(count = projects.len(), "Fetched Jira projects");
        Ok(projects)
    }

    async fn add_worklog(&self, worklog: &NewWorklog) -> Result<Worklog, AppError> {
        let path = format!("/rest/api/2/issue/{}/worklog", worklog.issue_key);
        let response = self
            .request(Method::POST, &path)
            .json(worklog)
            .send()
            .await?;

        let created: Worklog = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| AppError::Api {
                status: 201,
                message: format!("failed to parse worklog response: {}", e),
            })?;

        tracing::debug!(
            issue_key = %worklog.issue_key,
            worklog_id = %created.id,
            "Created Jira worklog"
        );
        Ok(created)
    }
}
