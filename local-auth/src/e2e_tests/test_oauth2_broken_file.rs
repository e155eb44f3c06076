//! Test that an existing but broken OAuth2 file is reported, not replaced
//! by the disabled fallback.

use crate::e2e_tests::helpers::*;
use crate::security::{AuthSettingsError, OAuth2SettingsError};

#[test]
fn test_malformed_yaml_is_an_error() {
    let test = TestSettings::with_oauth_yaml(&[], "enabled: [true\n");

    let result = test.settings.oauth2();
    assert!(matches!(
        result,
        Err(AuthSettingsError::OAuth2(OAuth2SettingsError::Parse { .. }))
    ));
}

#[test]
fn test_enabled_provider_without_credentials_is_an_error() {
    let test = TestSettings::with_oauth_yaml(&[], "providers:\n  - name: huggingface\n");

    let result = test.settings.oauth2();
    assert!(matches!(
        result,
        Err(AuthSettingsError::OAuth2(OAuth2SettingsError::Invalid { .. }))
    ));
}

#[test]
fn test_directory_in_place_of_file_is_a_read_error() {
    let test = TestSettings::new(&[]);
    std::fs::create_dir(test.oauth_file()).expect("Failed to create directory");

    let result = test.settings.oauth2();
    assert!(matches!(
        result,
        Err(AuthSettingsError::OAuth2(OAuth2SettingsError::Read { .. }))
    ));
}

#[test]
fn test_failure_is_not_cached() {
    let test = TestSettings::with_oauth_yaml(&[], "enabled: [true\n");
    assert!(test.settings.oauth2().is_err());

    test.write_oauth_file(HUGGINGFACE_YAML);
    let oauth2 = test.settings.oauth2().expect("fixed OAuth2 file");
    assert!(oauth2.enabled);
}

#[test]
fn test_error_message_names_file() {
    let test = TestSettings::with_oauth_yaml(&[], "enabled: [true\n");

    let error = test.settings.oauth2().expect_err("broken file");
    assert!(error.to_string().contains("oauth.yaml"));
}

#[test]
fn test_empty_file_is_an_error() {
    for contents in ["", "\n  \n", "# just a comment\n", "---\nnull\n"] {
        let test = TestSettings::with_oauth_yaml(&[], contents);

        let result = test.settings.oauth2();
        assert!(
            matches!(
                result,
                Err(AuthSettingsError::OAuth2(OAuth2SettingsError::Invalid { .. }))
            ),
            "contents {contents:?} gave {result:?}"
        );
    }
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_is_a_read_error() {
    let test = TestSettings::new(&[]);
    std::os::unix::fs::symlink(test.oauth_file(), test.oauth_file())
        .expect("Failed to create symlink");

    let result = test.settings.oauth2();
    assert!(matches!(
        result,
        Err(AuthSettingsError::OAuth2(OAuth2SettingsError::Read { .. }))
    ));
}
