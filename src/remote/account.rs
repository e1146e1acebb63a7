//! Usage: Consumer account lookup against `/consumer/account`.

use crate::shared::error::AppResult;
use serde_json::Value;

/// Remote account details as returned after a user-credential login.
///
/// `raw_json` is the compact re-serialization of the parsed object; it is
/// what gets cached on the local user record.
#[derive(Debug, Clone)]
pub(crate) struct ConsumerAccount {
    pub(crate) name: String,
    pub(crate) raw_json: String,
}

/// Fetches the account behind a user-scoped bearer token.
///
/// The body must be a JSON object with a non-empty string `name`; anything
/// else is an error and the caller caches nothing.
pub(crate) async fn fetch_consumer_account(
    client: &reqwest::Client,
    base_url: &str,
    access_token: &str,
) -> AppResult<ConsumerAccount> {
    let response = client
        .get(format!("{base_url}/consumer/account"))
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| format!("SYSTEM_ERROR: account request failed: {e}"))?;

    let body = response
        .text()
        .await
        .map_err(|e| format!("SYSTEM_ERROR: account response read failed: {e}"))?;

    parse_account_body(&body)
}

fn parse_account_body(body: &str) -> AppResult<ConsumerAccount> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| format!("REMOTE_INVALID_RESPONSE: account response json invalid: {e}"))?;
    if !value.is_object() {
        return Err("REMOTE_INVALID_RESPONSE: account response is not a json object".into());
    }

    let name = value
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or("REMOTE_INVALID_RESPONSE: account response missing name")?
        .to_string();

    let raw_json = serde_json::to_string(&value)
        .map_err(|e| format!("SYSTEM_ERROR: account re-serialization failed: {e}"))?;

    Ok(ConsumerAccount { name, raw_json })
}
