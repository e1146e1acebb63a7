//! Usage: Bridge settings schema (storage keys, defaults, load/save helpers).

use crate::infra::store::SettingsStore;
use crate::shared::error::AppResult;
use serde::{Deserialize, Serialize};

pub const SETTING_BASE_URL: &str = "fusio_base_url";
pub const SETTING_APP_KEY: &str = "fusio_app_key";
pub const SETTING_APP_SECRET: &str = "fusio_app_secret";
pub const SETTING_ROLE_ID: &str = "fusio_role_id";

/// Role granted to newly provisioned accounts when the stored value is
/// missing or not numeric (the remote's consumer role).
pub const DEFAULT_ROLE_ID: i64 = 3;

/// Snapshot of the bridge configuration, loaded fresh from the settings
/// store before every operation. Never cached across events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeSettings {
    /// Root address of the remote Fusio instance, without a trailing slash.
    pub base_url: String,
    pub app_key: String,
    pub app_secret: String,
    pub role_id: i64,
}

impl BridgeSettings {
    pub fn load(store: &dyn SettingsStore) -> AppResult<Self> {
        let base_url = normalize_base_url(&read_or_default(store, SETTING_BASE_URL)?);
        let app_key = read_or_default(store, SETTING_APP_KEY)?.trim().to_string();
        let app_secret = read_or_default(store, SETTING_APP_SECRET)?.trim().to_string();
        let role_id = parse_role_id_lossy(store.get_setting(SETTING_ROLE_ID)?.as_deref());

        Ok(Self {
            base_url,
            app_key,
            app_secret,
            role_id,
        })
    }

    pub fn has_base_url(&self) -> bool {
        !self.base_url.is_empty()
    }

    /// Provisioning needs the instance address plus the app credential pair.
    pub fn is_provisioning_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.app_key.is_empty() && !self.app_secret.is_empty()
    }
}

/// Admin-facing settings form payload, persisted by [`save_settings`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsForm {
    pub base_url: String,
    pub app_key: String,
    pub app_secret: String,
    pub role_id: i64,
}

/// Persists all four settings keys. The role id is stored in its string form,
/// matching what a host settings form would submit.
pub fn save_settings(store: &dyn SettingsStore, form: &SettingsForm) -> AppResult<()> {
    store.set_setting(SETTING_BASE_URL, form.base_url.trim())?;
    store.set_setting(SETTING_APP_KEY, form.app_key.trim())?;
    store.set_setting(SETTING_APP_SECRET, form.app_secret.trim())?;
    store.set_setting(SETTING_ROLE_ID, &form.role_id.to_string())?;
    Ok(())
}

fn read_or_default(store: &dyn SettingsStore, key: &str) -> AppResult<String> {
    Ok(store.get_setting(key)?.unwrap_or_default())
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

fn parse_role_id_lossy(raw: Option<&str>) -> i64 {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<i64>().ok())
        .unwrap_or(DEFAULT_ROLE_ID)
}
