mod hooks;
mod infra;
mod remote;
mod shared;

pub use hooks::{FusioBridge, HostEvent, UserRecord, META_ACCESS_TOKEN, META_ACCOUNT};
pub use infra::logging;
pub use infra::settings::{
    save_settings, BridgeSettings, SettingsForm, DEFAULT_ROLE_ID, SETTING_APP_KEY,
    SETTING_APP_SECRET, SETTING_BASE_URL, SETTING_ROLE_ID,
};
pub use infra::store::{MemoryStore, SettingsStore, SqliteStore, UserMetaStore};
pub use shared::error::{AppError, AppResult};
