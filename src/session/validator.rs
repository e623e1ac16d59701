//! Pre-flight session validation.

use campus_core::models::Principal;
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};

use super::credentials::CredentialStore;
use crate::error::{AuthFailure, Result, SyncError};
use crate::http::join_url;

/// "Who am I" endpoint used as the session probe.
pub const PROBE_PATH: &str = "/api/user";

/// Decides whether a request may be attempted at all.
///
/// Validation fails closed: a missing token, a rejected token and a probe that
/// never reaches the server all end with the session cleared and `None`.
#[derive(Debug, Clone)]
pub struct SessionValidator {
    http: Client,
    base_url: String,
    credentials: CredentialStore,
}

impl SessionValidator {
    pub fn new(http: Client, base_url: impl Into<String>, credentials: CredentialStore) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            credentials,
        }
    }

    /// Return the stored token if the server still accepts it.
    pub async fn validate(&self) -> Option<String> {
        let Some(token) = self.credentials.get_token() else {
            tracing::debug!("No stored token, skipping session probe");
            return None;
        };

        match self.probe(&token).await {
            Ok(response) if response.status().is_success() => Some(token),
            Ok(response) => {
                tracing::warn!("Session rejected by server ({})", response.status());
                self.credentials.clear();
                None
            }
            Err(e) => {
                tracing::warn!("Session probe failed, treating session as invalid: {}", e);
                self.credentials.clear();
                None
            }
        }
    }

    /// Fetch the principal that owns `token`.
    ///
    /// Accepts the profile either bare or wrapped in `{ "data": {...} }`.
    pub async fn fetch_principal(&self, token: &str) -> Result<Principal> {
        let response = self.probe(token).await?;
        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SyncError::Authentication(AuthFailure::NoSession));
        }

        let body: serde_json::Value = response.json().await.unwrap_or_default();
        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Profile request failed: {}", status));
            return Err(SyncError::application(Some(status.as_u16()), message));
        }

        let profile = match body.get("data") {
            Some(data) if data.is_object() => data.clone(),
            _ => body,
        };
        serde_json::from_value(profile).map_err(|e| {
            tracing::warn!("Unexpected profile payload: {}", e);
            SyncError::application(
                Some(status.as_u16()),
                "The server returned an unexpected user profile",
            )
        })
    }

    async fn probe(&self, token: &str) -> reqwest::Result<Response> {
        self.http
            .get(join_url(&self.base_url, PROBE_PATH))
            .bearer_auth(token)
            .header(ACCEPT, "application/json")
            .send()
            .await
    }
}
