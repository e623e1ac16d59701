//! Mutation coordinator primitives.
//!
//! A mutation succeeds only if the transport succeeded (`2xx`) **and** the
//! body says so (`"success": true`). The API is known to answer `200 OK` with
//! `{"success": false, "message": ...}` for business-rule failures.

use reqwest::StatusCode;
use serde_json::Value;

use crate::error::{Result, SyncError, GENERIC_FAILURE};
use crate::http::{ApiRequest, AuthenticatedClient};

/// Lifecycle of the latest mutation on a service.
///
/// `Idle -> Submitting -> {Reconciled | Failed}`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MutationState {
    #[default]
    Idle,
    Submitting,
    /// The server accepted the change and the list was reloaded.
    Reconciled,
    Failed(String),
}

impl MutationState {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Self::Submitting)
    }
}

/// Successful mutation body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationReply {
    pub message: Option<String>,
    pub data: Option<Value>,
}

/// Gate for destructive actions.
pub trait ConfirmAction {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> ConfirmAction for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything. For hosts that already asked, e.g. `--yes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl ConfirmAction for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Send a mutation and apply the two-layer success check.
///
/// The body is parsed whatever the status; an unparseable or empty body counts
/// as `{}` and therefore as a failure.
pub async fn submit(client: &AuthenticatedClient, request: ApiRequest) -> Result<MutationReply> {
    let method = request.method().clone();
    let path = request.path().to_string();

    let response = client.execute(request).await?;
    let status = response.status();
    let text = response.text().await?;

    let body = if text.trim().is_empty() {
        Value::Object(Default::default())
    } else {
        serde_json::from_str(&text).unwrap_or_else(|e| {
            tracing::warn!("Non-JSON body from {} {}: {}", method, path, e);
            Value::Object(Default::default())
        })
    };

    let reply = check_reply(status, &body);
    if let Err(e) = &reply {
        tracing::error!("{} {} failed ({}): {}", method, path, status, e);
    }
    reply
}

/// Two-layer success check over a parsed response.
pub fn check_reply(status: StatusCode, body: &Value) -> Result<MutationReply> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string);
    let succeeded = body.get("success").map(is_truthy).unwrap_or(false);

    if !status.is_success() || !succeeded {
        return Err(SyncError::application(
            Some(status.as_u16()),
            message.unwrap_or_else(|| GENERIC_FAILURE.to_string()),
        ));
    }

    Ok(MutationReply {
        message,
        data: body.get("data").cloned(),
    })
}

/// Truthiness of a JSON value as the API's clients read it.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
