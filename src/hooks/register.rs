//! Usage: Registration hook (provisions the matching remote account).

use super::{FusioBridge, UserRecord};
use crate::infra::settings::BridgeSettings;
use crate::remote::backend_user::{self, NewRemoteUser, ProvisionOutcome};
use crate::remote::token;

/// Fire-and-forget provisioning. Missing configuration is a silent no-op;
/// every remote failure is logged and swallowed so the host registration
/// flow is never blocked.
pub(super) async fn provision_user(bridge: &FusioBridge, user: &UserRecord) {
    let cfg = match BridgeSettings::load(bridge.settings.as_ref()) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::error!("failed to load bridge settings: {err}");
            return;
        }
    };
    if !cfg.is_provisioning_configured() {
        return;
    }

    // The exchange uses the app's own identity, not the new user's.
    let access_token =
        match token::obtain_access_token(&bridge.http, &cfg.base_url, &cfg.app_key, &cfg.app_secret)
            .await
        {
            Some(token) => token,
            None => {
                tracing::warn!(
                    base_url = %cfg.base_url,
                    "could not obtain access token for Fusio instance {}; check the configured \
                     base URL and app key/secret",
                    cfg.base_url
                );
                return;
            }
        };

    let remote_user = NewRemoteUser::active(cfg.role_id, &user.login, &user.email, &user.password);
    match backend_user::create_backend_user(&bridge.http, &cfg.base_url, &access_token, &remote_user)
        .await
    {
        Ok(ProvisionOutcome::Accepted) => {}
        Ok(ProvisionOutcome::Rejected { message }) => {
            tracing::error!(
                base_url = %cfg.base_url,
                user_id = user.id,
                "could not create user at Fusio instance {} got: {message}",
                cfg.base_url
            );
        }
        Err(err) => {
            tracing::error!(
                base_url = %cfg.base_url,
                user_id = user.id,
                "an error occurred while registering a new user, the Fusio instance returned an \
                 invalid response: {err}"
            );
        }
    }
}
