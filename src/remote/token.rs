//! Usage: OAuth2 client-credentials exchange against `/authorization/token`.

use crate::shared::error::AppResult;
use crate::shared::security::mask_token;
use serde_json::Value;

/// Exchanges a key/secret pair for a bearer access token.
///
/// Every failure mode (transport error, non-2xx status, malformed JSON,
/// missing or empty `access_token`) collapses to `None`; the reason is kept
/// at debug level. The same endpoint serves both the app credential pair and,
/// on the login path, the end user's own credentials.
pub(crate) async fn obtain_access_token(
    client: &reqwest::Client,
    base_url: &str,
    key: &str,
    secret: &str,
) -> Option<String> {
    match request_token(client, base_url, key, secret).await {
        Ok(token) => {
            tracing::debug!(
                base_url = %base_url,
                token = %mask_token(&token),
                "obtained access token"
            );
            Some(token)
        }
        Err(err) => {
            tracing::debug!(base_url = %base_url, "token exchange failed: {err}");
            None
        }
    }
}

async fn request_token(
    client: &reqwest::Client,
    base_url: &str,
    key: &str,
    secret: &str,
) -> AppResult<String> {
    let response = client
        .post(format!("{base_url}/authorization/token"))
        .basic_auth(key, Some(secret))
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|e| format!("SYSTEM_ERROR: token request failed: {e}"))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| format!("SYSTEM_ERROR: token response read failed: {e}"))?;

    if !status.is_success() {
        return Err(format!(
            "SYSTEM_ERROR: token endpoint returned status={}",
            status.as_u16()
        )
        .into());
    }

    parse_token_body(&body)
}

fn parse_token_body(body: &str) -> AppResult<String> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| format!("SYSTEM_ERROR: token response json invalid: {e}"))?;

    value
        .get("access_token")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| "SYSTEM_ERROR: token response missing access_token".into())
}
