//! Usage: Host-facing surface (the bridge value and its event handlers).
//!
//! The host platform owns the event loop: it constructs one [`FusioBridge`]
//! and dispatches [`HostEvent`] values into [`FusioBridge::handle`] from its
//! own register/login/logout hooks. Handlers never fail the host flow; all
//! remote trouble ends up in the diagnostic log.

mod register;
mod session;

use crate::infra::settings::{self, BridgeSettings, SettingsForm};
use crate::infra::store::{SettingsStore, UserMetaStore};
use crate::remote;
use crate::shared::error::AppResult;
use std::sync::Arc;

/// Per-user metadata key holding the cached bearer token.
pub const META_ACCESS_TOKEN: &str = "fusio_access_token";
/// Per-user metadata key holding the cached remote account JSON.
pub const META_ACCOUNT: &str = "fusio_account";

/// Local user record as the host platform sees it. The password is the
/// cleartext value transiently held during registration or login validation;
/// this crate never stores it.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i64,
    pub login: String,
    pub email: String,
    pub password: String,
}

/// User-session lifecycle events supplied by the host platform.
#[derive(Debug, Clone)]
pub enum HostEvent {
    Register(UserRecord),
    Login { login: String, user: UserRecord },
    Logout { user_id: i64 },
}

pub struct FusioBridge {
    pub(crate) settings: Arc<dyn SettingsStore>,
    pub(crate) user_meta: Arc<dyn UserMetaStore>,
    pub(crate) http: reqwest::Client,
}

impl FusioBridge {
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        user_meta: Arc<dyn UserMetaStore>,
    ) -> AppResult<Self> {
        Ok(Self {
            settings,
            user_meta,
            http: remote::build_http_client()?,
        })
    }

    /// Dispatch table for the host's named events.
    pub async fn handle(&self, event: HostEvent) {
        match event {
            HostEvent::Register(user) => self.on_register(&user).await,
            HostEvent::Login { login, user } => self.on_login(&login, &user).await,
            HostEvent::Logout { user_id } => self.on_logout(user_id),
        }
    }

    /// Registration hook: provision a matching account on the remote
    /// instance. Best-effort; the host registration has already succeeded.
    pub async fn on_register(&self, user: &UserRecord) {
        register::provision_user(self, user).await;
    }

    /// Login hook: exchange the user's own credentials for a token and cache
    /// token + account details on the user record.
    pub async fn on_login(&self, login: &str, user: &UserRecord) {
        session::cache_session(self, login, user).await;
    }

    /// Logout hook: forget the cached token and account, whether or not they
    /// were ever set.
    pub fn on_logout(&self, user_id: i64) {
        session::clear_session(self, user_id);
    }

    /// Settings-save verification: re-attempts the credential exchange with
    /// the currently stored app key/secret. Blocks until the remote call
    /// completes; the returned error message is meant for the admin screen.
    pub async fn verify_settings(&self) -> AppResult<()> {
        let cfg = BridgeSettings::load(self.settings.as_ref())?;
        match remote::token::obtain_access_token(
            &self.http,
            &cfg.base_url,
            &cfg.app_key,
            &cfg.app_secret,
        )
        .await
        {
            Some(_) => Ok(()),
            None => Err(format!(
                "AUTH_TOKEN_UNAVAILABLE: could not obtain an access token at the Fusio instance \
                 {} for the provided app credentials; check the base URL and app key/secret",
                cfg.base_url
            )
            .into()),
        }
    }

    /// Persists the settings form, then verifies it against the remote
    /// instance. The settings are saved even when verification fails, so the
    /// admin can correct them incrementally.
    pub async fn save_settings(&self, form: &SettingsForm) -> AppResult<()> {
        settings::save_settings(self.settings.as_ref(), form)?;
        self.verify_settings().await
    }
}
