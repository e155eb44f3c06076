//! Authentication settings.
//!
//! # Post-conditions
//! - Settings are immutable once loaded, apart from the lazily filled OAuth2 slot.
//!
//! # Invariants
//! - OAuth2 settings are resolved at most once per `AuthSettings` value.

pub mod oauth2;
pub mod settings;

pub use oauth2::{AllowedWorkspace, OAuth2ProviderSettings, OAuth2Settings, OAuth2SettingsError};
pub use settings::{AuthSettings, AuthSettingsError};
