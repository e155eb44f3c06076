//! Test alias precedence for environment-bound fields.

use secrecy::ExposeSecret;

use crate::security::AuthSettings;
use crate::testing::env;

#[test]
fn test_token_expiration_from_env() {
    let settings = AuthSettings::from_vars(&env(&[("TOKEN_EXPIRATION_IN_MINUTES", "42")]))
        .expect("valid settings");

    assert_eq!(settings.token_expiration_in_minutes(), 42);
    assert_eq!(settings.token_expire_seconds(), 2520);
}

#[test]
fn test_token_expiration_prefixed_alias() {
    let settings = AuthSettings::from_vars(&env(&[(
        "ARGILLA_LOCAL_AUTH_TOKEN_EXPIRATION_IN_MINUTES",
        "60",
    )]))
    .expect("valid settings");

    assert_eq!(settings.token_expiration_in_minutes(), 60);
}

#[test]
fn test_token_expiration_unprefixed_wins() {
    let settings = AuthSettings::from_vars(&env(&[
        ("ARGILLA_LOCAL_AUTH_TOKEN_EXPIRATION_IN_MINUTES", "60"),
        ("TOKEN_EXPIRATION_IN_MINUTES", "5"),
    ]))
    .expect("valid settings");

    assert_eq!(settings.token_expiration_in_minutes(), 5);
}

#[test]
fn test_empty_unprefixed_expiration_falls_through() {
    let settings = AuthSettings::from_vars(&env(&[
        ("TOKEN_EXPIRATION_IN_MINUTES", ""),
        ("ARGILLA_LOCAL_AUTH_TOKEN_EXPIRATION_IN_MINUTES", "30"),
    ]))
    .expect("valid settings");

    assert_eq!(settings.token_expiration_in_minutes(), 30);
}

#[test]
fn test_secret_key_unprefixed_wins() {
    let settings = AuthSettings::from_vars(&env(&[
        ("ARGILLA_LOCAL_AUTH_SECRET_KEY", "prefixed"),
        ("SECRET_KEY", "plain"),
    ]))
    .expect("valid settings");

    assert_eq!(settings.secret_key().expose_secret(), "plain");
}

#[test]
fn test_configured_secret_key_is_stable() {
    let pairs = [("SECRET_KEY", "fixed")];
    let first = AuthSettings::from_vars(&env(&pairs)).expect("valid settings");
    let second = AuthSettings::from_vars(&env(&pairs)).expect("valid settings");

    assert_eq!(
        first.secret_key().expose_secret(),
        second.secret_key().expose_secret()
    );
}
