//! Usage: Account provisioning against `/backend/user`.

use crate::shared::error::AppResult;
use serde::Serialize;
use serde_json::Value;

/// Remote status value for accounts that are active immediately.
const STATUS_ACTIVE: i64 = 1;

/// Fallback when a rejection carries no usable `message` field.
pub(crate) const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Write-only payload for the remote account; no local representation is kept.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewRemoteUser {
    pub(crate) role_id: i64,
    pub(crate) status: i64,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl NewRemoteUser {
    pub(crate) fn active(role_id: i64, name: &str, email: &str, password: &str) -> Self {
        Self {
            role_id,
            status: STATUS_ACTIVE,
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }
}

/// What the remote instance said about a provisioning attempt. The HTTP
/// status is not consulted; the body's `success` flag is the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProvisionOutcome {
    Accepted,
    Rejected { message: String },
}

/// Creates the remote account with an app-level bearer token.
///
/// Returns `Err` only when the response body is not a JSON object; a
/// well-formed body always maps to a [`ProvisionOutcome`].
pub(crate) async fn create_backend_user(
    client: &reqwest::Client,
    base_url: &str,
    access_token: &str,
    user: &NewRemoteUser,
) -> AppResult<ProvisionOutcome> {
    let response = client
        .post(format!("{base_url}/backend/user"))
        .bearer_auth(access_token)
        .json(user)
        .send()
        .await
        .map_err(|e| format!("SYSTEM_ERROR: backend user request failed: {e}"))?;

    let body = response
        .text()
        .await
        .map_err(|e| format!("SYSTEM_ERROR: backend user response read failed: {e}"))?;

    interpret_response_body(&body)
}

fn interpret_response_body(body: &str) -> AppResult<ProvisionOutcome> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| format!("REMOTE_INVALID_RESPONSE: backend user response json invalid: {e}"))?;
    if !value.is_object() {
        return Err("REMOTE_INVALID_RESPONSE: backend user response is not a json object".into());
    }

    // Only an explicit boolean `true` counts as accepted; a missing or
    // non-boolean `success` is a rejection.
    if value.get("success").and_then(Value::as_bool) == Some(true) {
        return Ok(ProvisionOutcome::Accepted);
    }

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_ERROR_MESSAGE.to_string());

    Ok(ProvisionOutcome::Rejected { message })
}
