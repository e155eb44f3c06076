//! OAuth2 login configuration.
//!
//! The configuration lives in a YAML file:
//!
//! ```yaml
//! enabled: true
//! allow_http_redirect: false
//! providers:
//!   - name: huggingface
//!     client_id: my-client-id
//!     client_secret: my-client-secret
//!     scope: openid profile
//! allowed_workspaces:
//!   - name: argilla
//! ```
//!
//! Provider credentials may be left out of the file and supplied through
//! `OAUTH2_<NAME>_CLIENT_ID` / `OAUTH2_<NAME>_CLIENT_SECRET`, where `<NAME>` is
//! the provider name upper-cased with `-` replaced by `_`. Non-empty
//! environment values take precedence over the file.
//!
//! # Invariants
//!
//! - Provider names are non-empty and unique
//! - When enabled, every provider has both a client id and a client secret

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Format, Serialized, Yaml};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::config::EnvVars;

/// Prefix shared by all OAuth2 credential override variables.
pub const OAUTH2_ENV_PREFIX: &str = "OAUTH2_";

/// Error returned when an OAuth2 settings file cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum OAuth2SettingsError {
    /// The file exists but could not be read.
    #[error("failed to read OAuth2 settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid YAML or does not match the expected schema.
    #[error("failed to parse OAuth2 settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: Box<figment::Error>,
    },
    /// The file parsed but describes an unusable configuration.
    #[error("invalid OAuth2 settings in {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

/// A single OAuth2 identity provider.
#[derive(Debug)]
pub struct OAuth2ProviderSettings {
    /// Provider name, e.g. `huggingface`.
    pub name: String,
    pub client_id: Option<String>,
    pub client_secret: Option<SecretString>,
    /// Space separated scopes requested during authorization.
    pub scope: Option<String>,
}

impl OAuth2ProviderSettings {
    /// Create a provider entry with no credentials.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            client_id: None,
            client_secret: None,
            scope: None,
        }
    }

    /// Set the client credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(secret(client_secret.into()));
        self
    }

    /// Name of the variable overriding `field` for this provider.
    fn env_var(&self, field: &str) -> String {
        let name = self.name.to_ascii_uppercase().replace('-', "_");
        format!("{OAUTH2_ENV_PREFIX}{name}_{field}")
    }

    fn apply_env_overrides(&mut self, env: &EnvVars) {
        if let Some(client_id) = env.get(&self.env_var("CLIENT_ID")) {
            self.client_id = Some(client_id.to_string());
        }
        if let Some(client_secret) = env.get(&self.env_var("CLIENT_SECRET")) {
            self.client_secret = Some(secret(client_secret.to_string()));
        }
    }
}

/// A workspace users are allowed to be assigned to after an OAuth2 login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllowedWorkspace {
    pub name: String,
}

/// OAuth2 login configuration.
#[derive(Debug)]
pub struct OAuth2Settings {
    /// Whether OAuth2 login is offered at all.
    pub enabled: bool,
    /// Allow redirect URLs over plain HTTP. Only meant for local development.
    pub allow_http_redirect: bool,
    /// Configured providers, in file order.
    pub providers: Vec<OAuth2ProviderSettings>,
    /// Workspaces OAuth2 users may join. Empty means no restriction.
    pub allowed_workspaces: Vec<AllowedWorkspace>,
}

impl OAuth2Settings {
    /// Create settings from parts, with HTTP redirects disallowed and no
    /// workspace restriction.
    #[must_use]
    pub const fn new(enabled: bool, providers: Vec<OAuth2ProviderSettings>) -> Self {
        Self {
            enabled,
            allow_http_redirect: false,
            providers,
            allowed_workspaces: Vec::new(),
        }
    }

    /// Settings used when no OAuth2 file is present.
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new(false, Vec::new())
    }

    /// Load settings from a YAML file, without environment overrides.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, OAuth2SettingsError> {
        Self::from_yaml_with_env(path, &EnvVars::default())
    }

    /// Load settings from a YAML file and apply provider credential overrides
    /// from `env`.
    pub fn from_yaml_with_env(
        path: impl AsRef<Path>,
        env: &EnvVars,
    ) -> Result<Self, OAuth2SettingsError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| OAuth2SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        // The defaults layer would otherwise turn an empty document into an
        // enabled configuration.
        if is_empty_document(&contents) {
            return Err(OAuth2SettingsError::Invalid {
                path: path.to_path_buf(),
                reason: "file holds no settings".to_string(),
            });
        }

        let file: OAuth2File = Figment::from(Serialized::defaults(OAuth2FileDefaults::default()))
            .merge(Yaml::string(&contents))
            .extract()
            .map_err(|source| OAuth2SettingsError::Parse {
                path: path.to_path_buf(),
                source: Box::new(source),
            })?;

        let mut settings = Self::from(file);
        for provider in &mut settings.providers {
            provider.apply_env_overrides(env);
        }

        settings.validate().map_err(|reason| OAuth2SettingsError::Invalid {
            path: path.to_path_buf(),
            reason,
        })?;

        Ok(settings)
    }

    /// Look up a provider by name.
    #[must_use]
    pub fn provider(&self, name: &str) -> Option<&OAuth2ProviderSettings> {
        self.providers.iter().find(|provider| provider.name == name)
    }

    /// Provider names in configuration order.
    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.name.as_str()).collect()
    }

    /// Whether OAuth2 users may be assigned to `workspace`.
    #[must_use]
    pub fn is_workspace_allowed(&self, workspace: &str) -> bool {
        self.allowed_workspaces.is_empty()
            || self
                .allowed_workspaces
                .iter()
                .any(|allowed| allowed.name == workspace)
    }

    fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::new();
        for provider in &self.providers {
            if provider.name.trim().is_empty() {
                return Err("provider name must not be empty".to_string());
            }
            if !seen.insert(provider.name.as_str()) {
                return Err(format!("provider '{}' is configured more than once", provider.name));
            }
            if self.enabled {
                if provider.client_id.is_none() {
                    return Err(format!(
                        "provider '{}' has no client_id (set it in the file or via {})",
                        provider.name,
                        provider.env_var("CLIENT_ID")
                    ));
                }
                if provider.client_secret.is_none() {
                    return Err(format!(
                        "provider '{}' has no client_secret (set it in the file or via {})",
                        provider.name,
                        provider.env_var("CLIENT_SECRET")
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Whether a YAML document is blank, comments only, or an explicit null.
fn is_empty_document(contents: &str) -> bool {
    let body: Vec<&str> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter(|line| *line != "---" && *line != "...")
        .collect();
    match body.as_slice() {
        [] => true,
        [only] => matches!(*only, "~" | "null" | "Null" | "NULL"),
        _ => false,
    }
}

fn secret(value: String) -> SecretString {
    SecretString::new(value.into_boxed_str())
}

/// Defaults layered under the file contents.
#[derive(Serialize)]
struct OAuth2FileDefaults {
    enabled: bool,
    allow_http_redirect: bool,
}

impl Default for OAuth2FileDefaults {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_http_redirect: false,
        }
    }
}

/// On-disk shape of the OAuth2 settings file.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OAuth2File {
    enabled: bool,
    allow_http_redirect: bool,
    #[serde(default)]
    providers: Vec<ProviderEntry>,
    #[serde(default)]
    allowed_workspaces: Vec<AllowedWorkspace>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ProviderEntry {
    name: String,
    client_id: Option<String>,
    client_secret: Option<String>,
    scope: Option<String>,
}

impl From<OAuth2File> for OAuth2Settings {
    fn from(file: OAuth2File) -> Self {
        Self {
            enabled: file.enabled,
            allow_http_redirect: file.allow_http_redirect,
            providers: file
                .providers
                .into_iter()
                .map(|entry| OAuth2ProviderSettings {
                    name: entry.name,
                    client_id: entry.client_id.filter(|id| !id.is_empty()),
                    client_secret: entry.client_secret.filter(|s| !s.is_empty()).map(secret),
                    scope: entry.scope,
                })
                .collect(),
            allowed_workspaces: file.allowed_workspaces,
        }
    }
}
