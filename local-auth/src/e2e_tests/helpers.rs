//! Common helpers for end-to-end tests.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::security::AuthSettings;
use crate::testing::{env, write_file};

/// An enabled configuration with a single fully configured provider.
pub const HUGGINGFACE_YAML: &str = "
enabled: true
providers:
  - name: huggingface
    client_id: hf-client
    client_secret: hf-secret
    scope: openid profile
";

/// Settings pointed at an OAuth2 file inside a private scratch directory.
///
/// The directory is removed when the value is dropped.
pub struct TestSettings {
    pub settings: AuthSettings,
    dir: TempDir,
}

impl TestSettings {
    /// Build settings from `pairs`, with the OAuth2 file path set to a file
    /// that does not exist yet.
    #[must_use]
    pub fn new(pairs: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let settings = AuthSettings::from_vars(&env(pairs))
            .expect("valid settings")
            .with_oauth_file(dir.path().join("oauth.yaml"));
        Self { settings, dir }
    }

    /// Build settings whose OAuth2 file already holds `contents`.
    #[must_use]
    pub fn with_oauth_yaml(pairs: &[(&str, &str)], contents: &str) -> Self {
        let test = Self::new(pairs);
        test.write_oauth_file(contents);
        test
    }

    pub fn oauth_file(&self) -> &Path {
        self.settings.oauth_file()
    }

    pub fn write_oauth_file(&self, contents: &str) -> PathBuf {
        write_file(self.dir.path(), "oauth.yaml", contents)
    }

    pub fn remove_oauth_file(&self) {
        std::fs::remove_file(self.oauth_file()).expect("Failed to remove OAuth2 file");
    }
}
