//! Test that unusable environment values fail construction instead of
//! silently falling back to defaults.

use crate::config::ConfigError;
use crate::security::{AuthSettings, AuthSettingsError};
use crate::testing::env;

#[test]
fn test_non_numeric_expiration() {
    let result = AuthSettings::from_vars(&env(&[("TOKEN_EXPIRATION_IN_MINUTES", "notanumber")]));

    match result {
        Err(AuthSettingsError::Config(ConfigError::InvalidValue { name, message })) => {
            assert_eq!(name, "TOKEN_EXPIRATION_IN_MINUTES");
            assert!(message.contains("notanumber"));
        }
        other => panic!("Expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_invalid_unprefixed_expiration_does_not_fall_through() {
    let result = AuthSettings::from_vars(&env(&[
        ("TOKEN_EXPIRATION_IN_MINUTES", "soon"),
        ("ARGILLA_LOCAL_AUTH_TOKEN_EXPIRATION_IN_MINUTES", "30"),
    ]));

    assert!(matches!(result, Err(AuthSettingsError::Config(_))));
}

#[test]
fn test_non_numeric_prefixed_expiration() {
    let result = AuthSettings::from_vars(&env(&[(
        "ARGILLA_LOCAL_AUTH_TOKEN_EXPIRATION_IN_MINUTES",
        "1.5",
    )]));

    match result {
        Err(AuthSettingsError::Config(ConfigError::InvalidValue { name, .. })) => {
            assert_eq!(name, "ARGILLA_LOCAL_AUTH_TOKEN_EXPIRATION_IN_MINUTES");
        }
        other => panic!("Expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_error_message_names_variable() {
    let error = AuthSettings::from_vars(&env(&[("TOKEN_EXPIRATION_IN_MINUTES", "x")]))
        .expect_err("construction should fail");

    assert!(error.to_string().starts_with("invalid value for TOKEN_EXPIRATION_IN_MINUTES"));
}
