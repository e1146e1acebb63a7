//! Usage: Session hooks (token/account caching on login, cache clearing on logout).

use super::{FusioBridge, UserRecord, META_ACCESS_TOKEN, META_ACCOUNT};
use crate::infra::settings::BridgeSettings;
use crate::remote::{account, token};
use crate::shared::security::mask_token;

/// Login path. The user's own login/password pair is sent through the same
/// client-credentials exchange the app uses; this mirrors the remote
/// instance's behavior and is deliberately non-standard OAuth2. Any failure
/// leaves the local login untouched and the cache unwritten.
pub(super) async fn cache_session(bridge: &FusioBridge, login: &str, user: &UserRecord) {
    let cfg = match BridgeSettings::load(bridge.settings.as_ref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!("failed to load bridge settings: {err}");
            return;
        }
    };
    if !cfg.has_base_url() {
        return;
    }

    let access_token =
        match token::obtain_access_token(&bridge.http, &cfg.base_url, login, &user.password).await {
            Some(token) => token,
            None => return,
        };

    let remote_account =
        match account::fetch_consumer_account(&bridge.http, &cfg.base_url, &access_token).await {
            Ok(remote_account) => remote_account,
            Err(err) => {
                tracing::debug!(base_url = %cfg.base_url, "account fetch skipped caching: {err}");
                return;
            }
        };

    // Later API calls by the host can reuse the obtained token.
    if let Err(err) = bridge
        .user_meta
        .set_user_meta(user.id, META_ACCESS_TOKEN, Some(&access_token))
    {
        tracing::error!(user_id = user.id, "failed to cache access token: {err}");
        return;
    }
    if let Err(err) = bridge
        .user_meta
        .set_user_meta(user.id, META_ACCOUNT, Some(&remote_account.raw_json))
    {
        tracing::error!(user_id = user.id, "failed to cache account details: {err}");
        return;
    }

    tracing::debug!(
        user_id = user.id,
        account_name = %remote_account.name,
        token = %mask_token(&access_token),
        "cached remote session"
    );
}

/// Logout path. Clears both cached values regardless of prior state.
pub(super) fn clear_session(bridge: &FusioBridge, user_id: i64) {
    for key in [META_ACCESS_TOKEN, META_ACCOUNT] {
        if let Err(err) = bridge.user_meta.set_user_meta(user_id, key, None) {
            tracing::error!(user_id, "failed to clear user meta {key}: {err}");
        }
    }
}
