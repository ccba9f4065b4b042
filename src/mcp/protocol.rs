//! MCP protocol response helpers.
//!
//! Every tool answers with a JSON envelope: `{"success": true, ...payload}`
//! on success and `{"success": false, "error": "..."}` on failure. Failures
//! are still delivered as content so the caller can read the message; the
//! MCP result is flagged as an error.

use rmcp::model::{CallToolResult, Content};
use rmcp::schemars::{self, JsonSchema};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Output format for tool responses.
#[derive(Debug, Clone, Copy, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON format (default).
    #[default]
    Json,
    /// TOON (Token-Oriented Object Notation) - 40-60% fewer tokens.
    Toon,
}

#[derive(Serialize)]
struct Success<'a, T> {
    success: bool,
    #[serde(flatten)]
    data: &'a T,
}

#[derive(Serialize)]
struct Failure {
    success: bool,
    error: String,
}

/// Tool outcome rendered as a `success`/`error` envelope.
///
/// # Example
///
/// ```ignore
/// let result = service.list_accounts(filter).await.map(ListAccountsResult::from);
/// Envelope::new(result, params.format).into()
/// ```
pub struct Envelope<T> {
    result: Result<T, AppError>,
    format: OutputFormat,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(result: Result<T, AppError>, format: Option<OutputFormat>) -> Self {
        Self {
            result,
            format: format.unwrap_or_default(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// The envelope as a JSON value.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        match &self.result {
            Ok(data) => serde_json::to_value(Success {
                success: true,
                data,
            }),
            Err(err) => serde_json::to_value(Failure {
                success: false,
                error: err.to_string(),
            }),
        }
    }

    fn to_content(&self) -> Result<Content, rmcp::model::ErrorData> {
        let value = self
            .to_value()
            .map_err(|e| rmcp::model::ErrorData::internal_error(e.to_string(), None))?;

        match self.format {
            OutputFormat::Json => Content::json(value),
            OutputFormat::Toon => {
                let toon_str = serde_toon::to_string(&value)
                    .unwrap_or_else(|e| format!("TOON serialization error: {}", e));
                Ok(Content::text(toon_str))
            }
        }
    }
}

impl<T: Serialize> From<Envelope<T>> for Result<CallToolResult, rmcp::model::ErrorData> {
    fn from(envelope: Envelope<T>) -> Self {
        let content = envelope.to_content()?;
        if envelope.is_success() {
            Ok(CallToolResult::success(vec![content]))
        } else {
            Ok(CallToolResult::error(vec![content]))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Payload {
        account_id: String,
        count: usize,
    }

    #[test]
    fn test_success_flattens_payload() {
        let envelope = Envelope::new(
            Ok(Payload {
                account_id: "team-alpha".to_string(),
                count: 2,
            }),
            None,
        );
        assert_eq!(
            envelope.to_value().unwrap(),
            json!({"success": true, "account_id": "team-alpha", "count": 2})
        );
    }

    #[test]
    fn test_failure_carries_error_string() {
        let envelope: Envelope<Payload> =
            Envelope::new(Err(AppError::AccountNotFound("invalid-account".to_string())), None);
        assert!(!envelope.is_success());
        assert_eq!(
            envelope.to_value().unwrap(),
            json!({"success": false, "error": "Account 'invalid-account' not found"})
        );
    }

    #[test]
    fn test_into_call_result() {
        let ok: Result<CallToolResult, rmcp::model::ErrorData> = Envelope::new(
            Ok(Payload {
                account_id: "a".to_string(),
                count: 0,
            }),
            None,
        )
        .into();
        assert_ne!(ok.unwrap().is_error, Some(true));

        let err: Result<CallToolResult, rmcp::model::ErrorData> =
            Envelope::<Payload>::new(Err(AppError::Validation("bad".to_string())), None).into();
        assert_eq!(err.unwrap().is_error, Some(true));
    }
}
