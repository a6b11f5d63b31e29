//! HTTP utilities for IBM Cloud REST API calls

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use crate::error::ProviderApiError;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and drops control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Pull a human readable message out of a provider error payload
///
/// PowerVS answers with `description`, IAM with `errorMessage`, others with
/// `message` or `error`. Falls back to the status reason. The message is
/// returned as sent; only log lines are sanitized.
pub(crate) fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["description", "errorMessage", "message", "error"]
            .iter()
            .find_map(|key| v.get(*key).and_then(|m| m.as_str()).map(str::to_string))
    });

    from_body.unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("API request failed")
            .to_string()
    })
}

/// HTTP client wrapper for IBM Cloud API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    debug: bool,
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("powervs-janitor/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            debug: false,
        })
    }

    /// Log request and response detail for every call
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Send a prepared request and decode the JSON reply
    ///
    /// `path` is only used for logs and errors. Returns `None` for an empty
    /// successful body.
    pub async fn execute(
        &self,
        method: &'static str,
        path: &str,
        request: RequestBuilder,
    ) -> Result<Option<Value>, ProviderApiError> {
        tracing::debug!("{} {}", method, path);

        let response = request
            .send()
            .await
            .map_err(|e| ProviderApiError::new(method, path, format!("Failed to send request: {e}")))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ProviderApiError::new(method, path, format!("Failed to read response body: {e}"))
                .with_status(status.as_u16())
        })?;

        if self.debug {
            tracing::debug!("{} {} -> {} {}", method, path, status, sanitize_for_log(&body));
        }

        if !status.is_success() {
            // Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!("API error: {} - {}", status, sanitize_for_log(&body));
            return Err(
                ProviderApiError::new(method, path, error_message(status, &body))
                    .with_status(status.as_u16()),
            );
        }

        if body.trim().is_empty() {
            return Ok(None);
        }

        serde_json::from_str(&body).map(Some).map_err(|e| {
            ProviderApiError::new(method, path, format!("Failed to parse response JSON: {e}"))
                .with_status(status.as_u16())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let body = "x".repeat(500);
        let sanitized = sanitize_for_log(&body);
        assert!(sanitized.starts_with(&"x".repeat(MAX_LOG_BODY_LENGTH)));
        assert!(sanitized.contains("500 bytes total"));
    }

    #[test]
    fn test_sanitize_strips_control_chars() {
        assert_eq!(sanitize_for_log("a\nb\tc d"), "abc d");
    }

    #[test]
    fn test_error_message_prefers_description() {
        let body = r#"{"description":"pvm-instance abc does not exist","error":"not found"}"#;
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, body),
            "pvm-instance abc does not exist"
        );
    }

    #[test]
    fn test_error_message_iam_shape() {
        let body = r#"{"errorCode":"BXNIM0415E","errorMessage":"Provided API key could not be found."}"#;
        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "Provided API key could not be found."
        );
    }

    #[test]
    fn test_error_message_is_not_truncated() {
        let description = format!("instance «vm-1» is busy\n{}", "d".repeat(300));
        let body = serde_json::json!({ "description": description }).to_string();
        assert_eq!(error_message(StatusCode::CONFLICT, &body), description);
    }

    #[test]
    fn test_error_message_falls_back_to_reason() {
        assert_eq!(error_message(StatusCode::NOT_FOUND, "<html>"), "Not Found");
    }
}
