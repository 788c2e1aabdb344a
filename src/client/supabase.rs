//! Supabase (PostgREST) client.
//!
//! Epistemic foundation:
//! - K_i: PostgREST exposes `PATCH /rest/v1/<table>?id=eq.<id>` for row updates
//! - K_i: `Prefer: return=representation` makes the response carry the updated rows
//! - B_i: API will respond within timeout (might fail)
//! - B_i: Error bodies follow the PostgREST shape (might not)

use crate::client::RowStore;
use crate::models::{ConfigError, RemoteError, Result, SupabaseConfig, Target};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

/// PostgREST error response.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    message: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Supabase REST client.
///
/// One request per call, no retries: a failed row is picked up again on the
/// next run because the checkpoint does not move past it.
pub struct SupabaseClient {
    client: reqwest::Client,
    rest_url: String,
    headers: HeaderMap,
    timeout: Duration,
}

impl SupabaseClient {
    /// Create a client from resolved configuration.
    ///
    /// Fails when the URL or key cannot be resolved.
    pub fn new(config: &SupabaseConfig) -> Result<Self> {
        let url = config.resolve_url()?;
        let key = config.resolve_key()?;
        Self::with_credentials(&url, &key, config.timeout_secs)
    }

    /// Create a client from an explicit project URL and API key.
    pub fn with_credentials(url: &str, key: &str, timeout_secs: u64) -> Result<Self> {
        let parsed = reqwest::Url::parse(url).map_err(|e| ConfigError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl {
                url: url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            }
            .into());
        }

        let timeout = Duration::from_secs(timeout_secs);
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigError::InvalidUrl {
                url: url.to_string(),
                reason: format!("building HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", url.trim_end_matches('/')),
            headers: Self::headers(key)?,
            timeout,
        })
    }

    /// Build headers for every request.
    fn headers(key: &str) -> std::result::Result<HeaderMap, ConfigError> {
        let invalid = |e: reqwest::header::InvalidHeaderValue| ConfigError::InvalidCredential {
            name: "supabase_key".to_string(),
            reason: e.to_string(),
        };

        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(invalid)?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        Ok(headers)
    }

    /// Base URL of the REST endpoint.
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }

    fn transport_error(&self, e: reqwest::Error) -> RemoteError {
        if e.is_timeout() {
            RemoteError::Timeout(self.timeout)
        } else {
            RemoteError::Transport(e)
        }
    }
}

impl RowStore for SupabaseClient {
    async fn update_column(
        &self,
        target: Target,
        id: &str,
        values: &[Value],
    ) -> std::result::Result<Vec<Value>, RemoteError> {
        let url = format!("{}/{}", self.rest_url, target.table);
        let mut body = Map::new();
        body.insert(
            target.column.as_str().to_string(),
            Value::Array(values.to_vec()),
        );

        let response = self
            .client
            .patch(&url)
            .headers(self.headers.clone())
            .query(&[("id", format!("eq.{id}"))])
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        debug!(id, status = status.as_u16(), "Update response received");

        if !status.is_success() {
            return Err(parse_api_error(status.as_u16(), &text));
        }

        // 204 without a body: accepted, but the updated rows were not returned
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(_) => Err(RemoteError::InvalidResponse(format!(
                "expected a JSON array of rows, got: {}",
                preview(&text)
            ))),
            Err(e) => Err(RemoteError::InvalidResponse(format!(
                "unparsable body ({e}): {}",
                preview(&text)
            ))),
        }
    }
}

fn parse_api_error(status: u16, body: &str) -> RemoteError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(err) => {
            let mut message = err.message;
            if let Some(details) = err.details.filter(|d| !d.is_empty()) {
                message = format!("{message} ({details})");
            }
            if let Some(hint) = err.hint.filter(|h| !h.is_empty()) {
                message = format!("{message}; hint: {hint}");
            }
            RemoteError::Api {
                status,
                code: err.code,
                message,
            }
        }
        Err(_) => RemoteError::Api {
            status,
            code: None,
            message: preview(body),
        },
    }
}

fn preview(text: &str) -> String {
    const MAX: usize = 200;
    let text = text.trim();
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
