// Life of the settings:
// 1. Environment is captured into a snapshot at startup
// 2. AuthSettings resolves each field from its alias list
// 3. The value is shared behind an Arc with every consumer
// 4. The first consumer asking for OAuth2 settings loads them:
//     - File present: parse YAML, apply env credential overrides, validate
//     - File absent: OAuth2 disabled
//    Every later request gets the same cached value

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod security;

mod e2e_tests;
mod testing;

pub use config::{ConfigError, EnvVars};
pub use security::{AuthSettings, AuthSettingsError, OAuth2Settings};
