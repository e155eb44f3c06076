//! Startup check for the local authentication settings.
//!
//! Loads the settings from the process environment, resolves the OAuth2
//! configuration and logs the effective values. Exits with status 1 when any
//! of them is unusable, so deployments can run it before starting the server.

use std::sync::Arc;

use local_auth::AuthSettings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "local_auth=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match AuthSettings::from_env() {
        Ok(settings) => Arc::new(settings),
        Err(e) => {
            tracing::error!("Failed to load authentication settings: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Loaded authentication settings: algorithm={:?}, token_expire_seconds={}, oauth_file={}",
        settings.algorithm(),
        settings.token_expire_seconds(),
        settings.oauth_file().display()
    );

    let oauth2 = match settings.oauth2() {
        Ok(oauth2) => oauth2,
        Err(e) => {
            tracing::error!("Failed to load OAuth2 settings: {e}");
            std::process::exit(1);
        }
    };

    if oauth2.enabled {
        tracing::info!(
            "OAuth2 login enabled: providers=[{}], allow_http_redirect={}",
            oauth2.provider_names().join(", "),
            oauth2.allow_http_redirect
        );
    } else {
        tracing::info!("OAuth2 login disabled");
    }
}
