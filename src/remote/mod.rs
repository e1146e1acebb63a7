//! Usage: Outbound calls to the remote Fusio instance (token exchange,
//! backend user provisioning, consumer account lookup).

pub(crate) mod account;
pub(crate) mod backend_user;
pub(crate) mod token;

use crate::shared::error::AppResult;

/// Builds the shared HTTP client. Transport defaults apply; the bridge adds
/// no timeout or retry policy of its own.
pub(crate) fn build_http_client() -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(format!("fusio-bridge/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| format!("SYSTEM_ERROR: failed to build http client: {e}").into())
}
