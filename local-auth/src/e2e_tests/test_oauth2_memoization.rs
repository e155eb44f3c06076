//! Test that a loaded OAuth2 file is read once and cached.

use std::sync::Arc;

use secrecy::ExposeSecret;

use crate::e2e_tests::helpers::*;

#[test]
fn test_enabled_provider_loaded() {
    let test = TestSettings::with_oauth_yaml(&[], HUGGINGFACE_YAML);

    let oauth2 = test.settings.oauth2().expect("valid OAuth2 file");
    assert!(oauth2.enabled);
    assert_eq!(oauth2.provider_names(), vec!["huggingface"]);

    let provider = oauth2.provider("huggingface").expect("provider present");
    assert_eq!(provider.client_id.as_deref(), Some("hf-client"));
    assert_eq!(
        provider.client_secret.as_ref().map(|s| s.expose_secret()),
        Some("hf-secret")
    );
    assert_eq!(provider.scope.as_deref(), Some("openid profile"));
}

#[test]
fn test_deleted_file_still_returns_cached_value() {
    let test = TestSettings::with_oauth_yaml(&[], HUGGINGFACE_YAML);

    let first = test.settings.oauth2().expect("valid OAuth2 file");
    test.remove_oauth_file();

    let second = test.settings.oauth2().expect("cached value");
    assert!(second.enabled);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_rewritten_file_is_not_reread() {
    let test = TestSettings::with_oauth_yaml(&[], HUGGINGFACE_YAML);

    let first = test.settings.oauth2().expect("valid OAuth2 file");
    test.write_oauth_file("enabled: false\n");

    let second = test.settings.oauth2().expect("cached value");
    assert!(second.enabled);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_env_credentials_captured_at_construction() {
    let test = TestSettings::with_oauth_yaml(
        &[
            ("OAUTH2_HUGGINGFACE_CLIENT_SECRET", "from-env"),
            ("SECRET_KEY", "unrelated"),
        ],
        HUGGINGFACE_YAML,
    );

    let oauth2 = test.settings.oauth2().expect("valid OAuth2 file");
    let provider = oauth2.provider("huggingface").expect("provider present");
    assert_eq!(
        provider.client_secret.as_ref().map(|s| s.expose_secret()),
        Some("from-env")
    );
}
