//! Test the values used when no relevant environment variable is set.

use std::path::Path;

use jsonwebtoken::Algorithm;
use secrecy::ExposeSecret;

use crate::security::AuthSettings;
use crate::testing::env;

#[test]
fn test_defaults_without_env() {
    let settings = AuthSettings::from_vars(&env(&[])).expect("valid settings");

    assert_eq!(settings.algorithm(), Algorithm::HS256);
    assert_eq!(settings.token_expiration_in_minutes(), 15);
    assert_eq!(settings.token_expire_seconds(), 900);
    assert_eq!(settings.oauth_file(), Path::new(".oauth.yaml"));
    assert_eq!(settings.secret_key().expose_secret().len(), 32);
}

#[test]
fn test_generated_secret_key_differs_per_construction() {
    let first = AuthSettings::from_vars(&env(&[])).expect("valid settings");
    let second = AuthSettings::from_vars(&env(&[])).expect("valid settings");

    assert!(!first.secret_key().expose_secret().is_empty());
    assert_ne!(
        first.secret_key().expose_secret(),
        second.secret_key().expose_secret()
    );
}

#[test]
fn test_unrelated_env_is_ignored() {
    let settings = AuthSettings::from_vars(&env(&[
        ("EXPIRATION_IN_MINUTES", "99"),
        ("ARGILLA_SECRET_KEY", "nope"),
    ]))
    .expect("valid settings");

    assert_eq!(settings.token_expiration_in_minutes(), 15);
    assert_ne!(settings.secret_key().expose_secret(), "nope");
}
