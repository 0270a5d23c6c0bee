//! Uniform envelope for tool results.
//!
//! Success is `{"success": true, "result": <body>}`. Failure is
//! `{"error": "<context>: <message>", "kind": .., "status": ..}` and is
//! flagged as an error result so clients can tell the two apart without
//! inspecting the text.

use iolmcp_core::ApiError;
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::params::ValidationError;

/// Error half of the envelope
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub error: String,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success(Value),
    Failure(ErrorDetail),
}

impl ToolOutcome {
    /// Wrap an API result, prefixing failures with `context`
    pub fn from_api(context: &str, result: Result<Value, ApiError>) -> Self {
        match result {
            Ok(body) => ToolOutcome::Success(body),
            Err(err) => {
                warn!(kind = err.kind(), status = ?err.status(), "{}: {}", context, err);
                ToolOutcome::Failure(ErrorDetail {
                    error: format!("{}: {}", context, err),
                    kind: err.kind(),
                    status: err.status(),
                })
            }
        }
    }

    pub fn invalid(context: &str, err: ValidationError) -> Self {
        ToolOutcome::Failure(ErrorDetail {
            error: format!("{}: {}", context, err),
            kind: "validation",
            status: None,
        })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Success(_))
    }

    pub fn to_json(&self) -> Value {
        match self {
            ToolOutcome::Success(body) => json!({ "success": true, "result": body }),
            ToolOutcome::Failure(detail) => json!(detail),
        }
    }

    pub fn into_call_result(self) -> CallToolResult {
        let text = serde_json::to_string_pretty(&self.to_json())
            .unwrap_or_else(|e| format!("{{\"error\":\"Failed to serialize result: {}\"}}", e));
        let content = vec![Content::text(text)];
        if self.is_success() {
            CallToolResult::success(content)
        } else {
            CallToolResult::error(content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_success_envelope() {
        let outcome = ToolOutcome::from_api("Error obteniendo saldos", Ok(json!({"total": 10})));
        assert_eq!(
            outcome.to_json(),
            json!({"success": true, "result": {"total": 10}})
        );
        assert_eq!(outcome.into_call_result().is_error, Some(false));
    }

    #[test]
    fn test_null_body_is_still_success() {
        let outcome = ToolOutcome::from_api("Error cancelando orden", Ok(Value::Null));
        assert_eq!(outcome.to_json(), json!({"success": true, "result": null}));
    }

    #[test]
    fn test_request_failure_envelope() {
        let err = ApiError::Request {
            status: StatusCode::NOT_FOUND,
            body: "no existe".to_string(),
        };
        let outcome = ToolOutcome::from_api("Error obteniendo cotizacion", Err(err));
        let value = outcome.to_json();
        assert_eq!(value["kind"], "request");
        assert_eq!(value["status"], 404);
        let message = value["error"].as_str().unwrap();
        assert!(message.starts_with("Error obteniendo cotizacion: "));
        assert!(message.contains("no existe"));
        assert!(value.get("success").is_none());
        assert_eq!(outcome.into_call_result().is_error, Some(true));
    }

    #[test]
    fn test_validation_failure_has_no_status() {
        let outcome = ToolOutcome::invalid(
            "Error obteniendo operaciones",
            ValidationError("fecha_desde must be a date".to_string()),
        );
        let value = outcome.to_json();
        assert_eq!(value["kind"], "validation");
        assert!(value.get("status").is_none());
        assert_eq!(
            value["error"],
            "Error obteniendo operaciones: fecha_desde must be a date"
        );
    }
}
