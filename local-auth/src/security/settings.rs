//! Local authentication settings.
//!
//! # Environment Variables
//!
//! - `SECRET_KEY`, then `ARGILLA_LOCAL_AUTH_SECRET_KEY`: key used to sign tokens
//!   (default: a random 32 character hex token, regenerated on every start)
//! - `ARGILLA_LOCAL_AUTH_ALGORITHM`: token signing algorithm (default: `HS256`)
//! - `TOKEN_EXPIRATION_IN_MINUTES`, then `ARGILLA_LOCAL_AUTH_TOKEN_EXPIRATION_IN_MINUTES`:
//!   token lifetime in minutes (default: `15`)
//! - `ARGILLA_LOCAL_AUTH_OAUTH_FILE`: path of the OAuth2 YAML file (default: `.oauth.yaml`)
//! - `OAUTH2_<PROVIDER>_CLIENT_ID`, `OAUTH2_<PROVIDER>_CLIENT_SECRET`: OAuth2
//!   provider credentials, see [`crate::security::oauth2`]
//!
//! # Invariants
//!
//! - Settings are immutable after construction, except for the OAuth2 slot
//! - The OAuth2 slot is filled at most once and never cleared

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use jsonwebtoken::Algorithm;
use rand::Rng;
use secrecy::SecretString;

use super::oauth2::{OAUTH2_ENV_PREFIX, OAuth2Settings, OAuth2SettingsError};
use crate::config::{ConfigError, EnvVars};

const SECRET_KEY_VARS: &[&str] = &["SECRET_KEY", "ARGILLA_LOCAL_AUTH_SECRET_KEY"];
const ALGORITHM_VARS: &[&str] = &["ARGILLA_LOCAL_AUTH_ALGORITHM"];
const TOKEN_EXPIRATION_VARS: &[&str] = &[
    "TOKEN_EXPIRATION_IN_MINUTES",
    "ARGILLA_LOCAL_AUTH_TOKEN_EXPIRATION_IN_MINUTES",
];
const OAUTH_FILE_VARS: &[&str] = &["ARGILLA_LOCAL_AUTH_OAUTH_FILE"];

/// Error returned by [`AuthSettings`].
#[derive(Debug, thiserror::Error)]
pub enum AuthSettingsError {
    /// An environment value could not be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The OAuth2 settings file exists but could not be loaded.
    #[error(transparent)]
    OAuth2(#[from] OAuth2SettingsError),
    /// The OAuth2 slot lock was poisoned by a panicking thread.
    #[error("OAuth2 settings lock poisoned")]
    LockPoisoned,
}

/// Authentication settings shared by the token issuer and login endpoints.
///
/// Constructed once at startup and handed to consumers behind an `Arc`.
#[derive(Debug)]
pub struct AuthSettings {
    secret_key: SecretString,
    algorithm: Algorithm,
    token_expiration_in_minutes: u32,
    oauth_file: PathBuf,
    /// `OAUTH2_*` variables captured at construction.
    oauth2_env: EnvVars,
    oauth2: RwLock<Option<Arc<OAuth2Settings>>>,
}

impl AuthSettings {
    pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::HS256;
    pub const DEFAULT_TOKEN_EXPIRATION_IN_MINUTES: u32 = 15;
    pub const DEFAULT_OAUTH_FILE: &'static str = ".oauth.yaml";

    /// Load settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the token expiration is set but is not a non-negative integer
    /// - the algorithm is set but is not an HMAC algorithm name
    pub fn from_env() -> Result<Self, AuthSettingsError> {
        Self::from_vars(&EnvVars::from_process())
    }

    /// Load settings from an environment snapshot.
    ///
    /// Only environment lookups happen here; the OAuth2 file is not touched
    /// until [`AuthSettings::oauth2`] is first called.
    pub fn from_vars(env: &EnvVars) -> Result<Self, AuthSettingsError> {
        let secret_key = Self::load_secret_key(env);
        let algorithm = Self::load_algorithm(env)?;
        let token_expiration_in_minutes = env
            .parse_first::<u32>(TOKEN_EXPIRATION_VARS, "a non-negative integer")?
            .unwrap_or(Self::DEFAULT_TOKEN_EXPIRATION_IN_MINUTES);
        let oauth_file = env.first_of(OAUTH_FILE_VARS).map_or_else(
            || PathBuf::from(Self::DEFAULT_OAUTH_FILE),
            |(_, value)| PathBuf::from(value),
        );

        Ok(Self {
            secret_key,
            algorithm,
            token_expiration_in_minutes,
            oauth_file,
            oauth2_env: env.with_prefix(OAUTH2_ENV_PREFIX),
            oauth2: RwLock::new(None),
        })
    }

    /// Point the settings at another OAuth2 file.
    #[must_use]
    pub fn with_oauth_file(mut self, oauth_file: impl Into<PathBuf>) -> Self {
        self.oauth_file = oauth_file.into();
        self
    }

    fn load_secret_key(env: &EnvVars) -> SecretString {
        if let Some((_, value)) = env.first_of(SECRET_KEY_VARS) {
            return SecretString::new(value.into());
        }
        tracing::warn!(
            "No secret key configured ({}); generated a random one. \
             Tokens will not survive a restart",
            SECRET_KEY_VARS.join(", ")
        );
        SecretString::new(generate_secret_key().into_boxed_str())
    }

    fn load_algorithm(env: &EnvVars) -> Result<Algorithm, ConfigError> {
        let Some((name, value)) = env.first_of(ALGORITHM_VARS) else {
            return Ok(Self::DEFAULT_ALGORITHM);
        };
        let algorithm = Algorithm::from_str(value).map_err(|_| ConfigError::InvalidValue {
            name: name.to_string(),
            message: format!("'{value}' is not a known signing algorithm"),
        })?;
        match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(algorithm),
            _ => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!(
                    "'{value}' needs a key pair; only HS256, HS384 and HS512 work with a secret key"
                ),
            }),
        }
    }

    /// Key used to sign and verify tokens.
    #[must_use]
    pub const fn secret_key(&self) -> &SecretString {
        &self.secret_key
    }

    /// Token signing algorithm.
    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    #[must_use]
    pub const fn token_expiration_in_minutes(&self) -> u32 {
        self.token_expiration_in_minutes
    }

    /// Token lifetime in seconds.
    #[must_use]
    pub fn token_expire_seconds(&self) -> u64 {
        u64::from(self.token_expiration_in_minutes) * 60
    }

    #[must_use]
    pub fn token_expiration(&self) -> Duration {
        Duration::from_secs(self.token_expire_seconds())
    }

    #[must_use]
    pub fn oauth_file(&self) -> &Path {
        &self.oauth_file
    }

    /// OAuth2 settings, loaded on first access and cached afterwards.
    ///
    /// The first successful call decides the value for the lifetime of these
    /// settings: if the OAuth2 file is absent, OAuth2 is disabled; if it is
    /// present, it is parsed. Later calls return the same `Arc` without
    /// touching the filesystem, even if the file has since appeared or
    /// disappeared.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the file exists but cannot be read, parsed or validated (not cached,
    ///   the next call tries again)
    /// - the slot lock is poisoned
    #[allow(clippy::significant_drop_tightening)] // The write lock must cover the load
    pub fn oauth2(&self) -> Result<Arc<OAuth2Settings>, AuthSettingsError> {
        // Fast path: already loaded (read lock only)
        {
            let slot = self
                .oauth2
                .read()
                .map_err(|_| AuthSettingsError::LockPoisoned)?;
            if let Some(settings) = slot.as_ref() {
                return Ok(Arc::clone(settings));
            }
        }

        let mut slot = self
            .oauth2
            .write()
            .map_err(|_| AuthSettingsError::LockPoisoned)?;

        // Double-check: another thread may have loaded it while we waited for the write lock
        if let Some(settings) = slot.as_ref() {
            return Ok(Arc::clone(settings));
        }

        let settings = Arc::new(self.load_oauth2()?);
        *slot = Some(Arc::clone(&settings));
        Ok(settings)
    }

    fn load_oauth2(&self) -> Result<OAuth2Settings, OAuth2SettingsError> {
        let exists = self
            .oauth_file
            .try_exists()
            .map_err(|source| OAuth2SettingsError::Read {
                path: self.oauth_file.clone(),
                source,
            })?;
        if !exists {
            tracing::debug!(
                "OAuth2 settings file {} not found; OAuth2 login disabled",
                self.oauth_file.display()
            );
            return Ok(OAuth2Settings::disabled());
        }

        let settings = OAuth2Settings::from_yaml_with_env(&self.oauth_file, &self.oauth2_env)?;
        tracing::info!(
            "Loaded OAuth2 settings from {}: enabled={}, providers=[{}]",
            self.oauth_file.display(),
            settings.enabled,
            settings.provider_names().join(", ")
        );
        Ok(settings)
    }
}

/// Random 128-bit token rendered as 32 lowercase hex characters.
fn generate_secret_key() -> String {
    let token: u128 = rand::rng().random();
    format!("{token:032x}")
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::testing::env;

    #[test]
    fn test_default_values() {
        assert_eq!(AuthSettings::DEFAULT_ALGORITHM, Algorithm::HS256);
        assert_eq!(AuthSettings::DEFAULT_TOKEN_EXPIRATION_IN_MINUTES, 15);
        assert_eq!(AuthSettings::DEFAULT_OAUTH_FILE, ".oauth.yaml");
    }

    #[test]
    fn test_generate_secret_key_shape() {
        let key = generate_secret_key();
        assert_eq!(key.len(), 32);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_secret_key_from_prefixed_var() {
        let settings =
            AuthSettings::from_vars(&env(&[("ARGILLA_LOCAL_AUTH_SECRET_KEY", "prefixed")]))
                .expect("valid settings");
        assert_eq!(settings.secret_key().expose_secret(), "prefixed");
    }

    #[test]
    fn test_empty_secret_key_falls_through() {
        let settings = AuthSettings::from_vars(&env(&[
            ("SECRET_KEY", ""),
            ("ARGILLA_LOCAL_AUTH_SECRET_KEY", "fallback"),
        ]))
        .expect("valid settings");
        assert_eq!(settings.secret_key().expose_secret(), "fallback");
    }

    #[test]
    fn test_algorithm_from_env() {
        let settings = AuthSettings::from_vars(&env(&[("ARGILLA_LOCAL_AUTH_ALGORITHM", "HS512")]))
            .expect("valid settings");
        assert_eq!(settings.algorithm(), Algorithm::HS512);
    }

    #[test]
    fn test_unknown_algorithm_rejected() {
        let result = AuthSettings::from_vars(&env(&[("ARGILLA_LOCAL_AUTH_ALGORITHM", "HS999")]));
        assert!(matches!(
            result,
            Err(AuthSettingsError::Config(ConfigError::InvalidValue { ref name, .. }))
                if name == "ARGILLA_LOCAL_AUTH_ALGORITHM"
        ));
    }

    #[test]
    fn test_asymmetric_algorithm_rejected() {
        let result = AuthSettings::from_vars(&env(&[("ARGILLA_LOCAL_AUTH_ALGORITHM", "RS256")]));
        assert!(matches!(result, Err(AuthSettingsError::Config(_))));
    }

    #[test]
    fn test_negative_expiration_rejected() {
        let result = AuthSettings::from_vars(&env(&[("TOKEN_EXPIRATION_IN_MINUTES", "-5")]));
        assert!(matches!(result, Err(AuthSettingsError::Config(_))));
    }

    #[test]
    fn test_negative_expiration_message() {
        let result = AuthSettings::from_vars(&env(&[("TOKEN_EXPIRATION_IN_MINUTES", "-5")]));
        match result {
            Err(AuthSettingsError::Config(ConfigError::InvalidValue { message, .. })) => {
                assert_eq!(message, "'-5' must be a non-negative integer");
            }
            other => panic!("Expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_expiration_surrounding_whitespace_ignored() {
        let settings = AuthSettings::from_vars(&env(&[("TOKEN_EXPIRATION_IN_MINUTES", " 42 ")]))
            .expect("valid settings");
        assert_eq!(settings.token_expiration_in_minutes(), 42);
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        let settings = AuthSettings::from_env().expect("valid settings");
        let expected = EnvVars::from_process().with_prefix(OAUTH2_ENV_PREFIX);
        assert_eq!(settings.oauth2_env.len(), expected.len());
    }

    #[test]
    fn test_expiration_duration() {
        let settings = AuthSettings::from_vars(&env(&[("TOKEN_EXPIRATION_IN_MINUTES", "2")]))
            .expect("valid settings");
        assert_eq!(settings.token_expiration(), Duration::from_secs(120));
    }

    #[test]
    fn test_large_expiration_does_not_overflow() {
        let settings = AuthSettings::from_vars(&env(&[(
            "TOKEN_EXPIRATION_IN_MINUTES",
            u32::MAX.to_string().as_str(),
        )]))
        .expect("valid settings");
        assert_eq!(settings.token_expire_seconds(), u64::from(u32::MAX) * 60);
    }

    #[test]
    fn test_oauth_file_from_env_and_builder() {
        let settings = AuthSettings::from_vars(&env(&[(
            "ARGILLA_LOCAL_AUTH_OAUTH_FILE",
            "/etc/oauth.yaml",
        )]))
        .expect("valid settings");
        assert_eq!(settings.oauth_file(), Path::new("/etc/oauth.yaml"));

        let settings = settings.with_oauth_file("other.yaml");
        assert_eq!(settings.oauth_file(), Path::new("other.yaml"));
    }

    #[test]
    fn test_only_oauth2_vars_are_kept() {
        let settings = AuthSettings::from_vars(&env(&[
            ("SECRET_KEY", "s"),
            ("OAUTH2_GITHUB_CLIENT_ID", "id"),
        ]))
        .expect("valid settings");
        assert_eq!(settings.oauth2_env.len(), 1);
        assert_eq!(settings.oauth2_env.get("OAUTH2_GITHUB_CLIENT_ID"), Some("id"));
    }

    #[test]
    fn test_debug_redacts_secret_key() {
        let settings = AuthSettings::from_vars(&env(&[("SECRET_KEY", "do-not-print-me")]))
            .expect("valid settings");
        let debug = format!("{settings:?}");
        assert!(!debug.contains("do-not-print-me"));
    }

    #[test]
    fn test_settings_are_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthSettings>();
    }
}
