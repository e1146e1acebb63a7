mod support;

use fusio_bridge::{
    SettingsForm, SettingsStore, SETTING_APP_KEY, SETTING_APP_SECRET, SETTING_BASE_URL,
    SETTING_ROLE_ID,
};
use httpmock::prelude::*;
use serde_json::json;
use support::TestHost;

fn form(base_url: &str) -> SettingsForm {
    SettingsForm {
        base_url: base_url.to_string(),
        app_key: "app-key".to_string(),
        app_secret: "app-secret".to_string(),
        role_id: 3,
    }
}

#[tokio::test]
async fn save_settings_persists_and_verifies() {
    let server = MockServer::start_async().await;
    let token_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/authorization/token");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"access_token": "abc123"}));
        })
        .await;

    let host = TestHost::new();
    host.bridge
        .save_settings(&form(&server.base_url()))
        .await
        .expect("settings accepted");

    token_mock.assert_async().await;
    assert_eq!(
        host.store.get_setting(SETTING_BASE_URL).unwrap().as_deref(),
        Some(server.base_url().as_str())
    );
    assert_eq!(
        host.store.get_setting(SETTING_APP_KEY).unwrap().as_deref(),
        Some("app-key")
    );
    assert_eq!(
        host.store.get_setting(SETTING_APP_SECRET).unwrap().as_deref(),
        Some("app-secret")
    );
    assert_eq!(
        host.store.get_setting(SETTING_ROLE_ID).unwrap().as_deref(),
        Some("3")
    );
}

#[tokio::test]
async fn save_settings_keeps_values_when_verification_fails() {
    let server = MockServer::start_async().await;
    let _token_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/authorization/token");
            then.status(401)
                .header("content-type", "application/json")
                .json_body(json!({"error": "invalid_client"}));
        })
        .await;

    let host = TestHost::new();
    let err = host
        .bridge
        .save_settings(&form(&server.base_url()))
        .await
        .expect_err("verification must fail");

    assert_eq!(err.code(), "AUTH_TOKEN_UNAVAILABLE");
    assert!(err.message().contains(&server.base_url()));

    // The admin sees the error, but the saved values stay in place.
    assert_eq!(
        host.store.get_setting(SETTING_BASE_URL).unwrap().as_deref(),
        Some(server.base_url().as_str())
    );
}

#[tokio::test]
async fn verify_settings_reports_unusable_token_response() {
    let server = MockServer::start_async().await;
    let _token_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/authorization/token");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"token_type": "bearer"}));
        })
        .await;

    let host = TestHost::with_settings(&server.base_url(), "app-key", "app-secret");
    let err = host
        .bridge
        .verify_settings()
        .await
        .expect_err("missing access_token must fail verification");

    assert_eq!(err.code(), "AUTH_TOKEN_UNAVAILABLE");
    assert!(err.message().contains("check the base URL"));
}
