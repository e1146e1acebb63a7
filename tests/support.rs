use std::sync::Arc;

use fusio_bridge::{
    logging, FusioBridge, MemoryStore, SettingsStore, UserRecord, SETTING_APP_KEY,
    SETTING_APP_SECRET, SETTING_BASE_URL, SETTING_ROLE_ID,
};

/// A bridge wired to in-memory stores, standing in for the host platform.
pub struct TestHost {
    pub store: Arc<MemoryStore>,
    pub bridge: FusioBridge,
}

impl TestHost {
    pub fn new() -> Self {
        logging::init();
        let store = Arc::new(MemoryStore::new());
        let bridge = FusioBridge::new(store.clone(), store.clone()).expect("build bridge");
        Self { store, bridge }
    }

    /// Seeds the full provisioning configuration (role id stays at its default).
    #[allow(dead_code)]
    pub fn with_settings(base_url: &str, app_key: &str, app_secret: &str) -> Self {
        let host = Self::new();
        host.seed_setting(SETTING_BASE_URL, base_url);
        host.seed_setting(SETTING_APP_KEY, app_key);
        host.seed_setting(SETTING_APP_SECRET, app_secret);
        host
    }

    pub fn seed_setting(&self, key: &str, value: &str) {
        self.store.set_setting(key, value).expect("seed setting");
    }

    #[allow(dead_code)]
    pub fn seed_role_id(&self, role_id: &str) {
        self.seed_setting(SETTING_ROLE_ID, role_id);
    }
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
pub fn user(id: i64, login: &str, email: &str, password: &str) -> UserRecord {
    UserRecord {
        id,
        login: login.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// Expected `Authorization` header for a Basic credential pair.
#[allow(dead_code)]
pub fn basic_auth_header(key: &str, secret: &str) -> String {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    format!("Basic {}", STANDARD.encode(format!("{key}:{secret}")))
}
