//! Authenticated request execution with uniform 401 handling.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};

use super::join_url;
use crate::error::{AuthFailure, Result, SyncError};
use crate::session::{CredentialStore, SessionValidator};

/// A request to the platform API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    body: Option<serde_json::Value>,
    headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Add a caller header. Headers the executor sets itself
    /// (`Authorization`, `Accept`, `Content-Type`) cannot be overridden.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Merge caller headers with the mandatory ones. Mandatory headers win.
pub fn merge_headers(caller: HeaderMap, token: &str) -> Result<HeaderMap> {
    let bearer = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
        tracing::warn!("Stored token contains characters that cannot be sent in a header");
        SyncError::Authentication(AuthFailure::NoSession)
    })?;

    let mut headers = caller;
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Executes API requests on behalf of the current session.
///
/// Every call is gated by [`SessionValidator::validate`]. Responses are
/// returned unopened except for 401, which clears the session. Nothing is
/// retried.
#[derive(Debug, Clone)]
pub struct AuthenticatedClient {
    http: Client,
    base_url: String,
    validator: SessionValidator,
    credentials: CredentialStore,
}

impl AuthenticatedClient {
    pub fn new(
        http: Client,
        base_url: impl Into<String>,
        validator: SessionValidator,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            validator,
            credentials,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn validator(&self) -> &SessionValidator {
        &self.validator
    }

    pub async fn execute(&self, request: ApiRequest) -> Result<Response> {
        let Some(token) = self.validator.validate().await else {
            tracing::debug!("Refusing {} {}: no valid session", request.method, request.path);
            return Err(SyncError::Authentication(AuthFailure::NoSession));
        };

        let ApiRequest {
            method,
            path,
            body,
            headers,
        } = request;
        let headers = merge_headers(headers, &token)?;

        tracing::debug!("{} {}", method, path);
        let mut builder = self
            .http
            .request(method.clone(), join_url(&self.base_url, &path))
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!("Session expired during {} {}", method, path);
            self.credentials.clear();
            return Err(SyncError::Authentication(AuthFailure::SessionExpired));
        }

        Ok(response)
    }
}
