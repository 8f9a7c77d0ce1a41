//! Thin PostgREST client for a Supabase project

use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;

use kura::DomainError;

use crate::config::SupabaseSettings;

/// Authenticated HTTP access to `{url}/rest/v1`
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    http: Client,
    rest_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(settings: &SupabaseSettings, timeout: Duration) -> Result<Self, DomainError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("kura/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", settings.url.trim_end_matches('/')),
            api_key: settings.anon_key.clone(),
        })
    }

    /// Request against a table endpoint with auth headers attached
    pub fn table(&self, method: Method, table: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}/{}", self.rest_url, table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Turn a non-success PostgREST response into a readable cause.
///
/// PostgREST reports errors as `{"message": ..., "code": ...}`; the
/// message is used when present, otherwise the status line.
pub async fn error_cause(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| {
            if body.trim().is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {body}")
            }
        })
}
