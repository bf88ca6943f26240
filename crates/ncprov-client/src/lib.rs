//! # ncprov-client: Nextcloud OCS provisioning client
//!
//! Typed async access to the parts of the Nextcloud OCS API that `ncprov`
//! needs: creating users, updating their profile fields, and (re)sending
//! welcome emails. On top of it sit the [`actions`] that the batch
//! dispatcher in `ncprov-core` runs per record.
//!
//! ## Conventions
//!
//! - Every request carries `OCS-APIRequest: true`, asks for JSON, and
//!   authenticates with HTTP basic auth.
//! - Request bodies are form-encoded.
//! - A call succeeds only if the HTTP status is 2xx **and** the OCS
//!   `meta.statuscode` is 100.

pub mod actions;
pub mod config;
pub mod error;
pub mod ocs;
pub(crate) mod retry;
pub mod users;

pub use actions::{CreateAccount, SendWelcomeEmail};
pub use config::NextcloudConfig;
pub use error::NextcloudApiError;

use std::sync::Arc;
use std::time::Duration;

/// Top-level Nextcloud client.
#[derive(Debug, Clone)]
pub struct NextcloudClient {
    users: users::UsersClient,
}

impl NextcloudClient {
    /// Create a new client from configuration. No request is sent.
    pub fn new(config: NextcloudConfig) -> Result<Self, NextcloudApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::HeaderName::from_static("ocs-apirequest"),
                    reqwest::header::HeaderValue::from_static("true"),
                );
                headers.insert(
                    reqwest::header::ACCEPT,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .map_err(|e| NextcloudApiError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;

        let auth = Arc::new(users::BasicAuth {
            username: config.username,
            password: config.password,
        });

        Ok(Self {
            users: users::UsersClient::new(http, &config.base_url, auth)?,
        })
    }

    /// Access the users client.
    pub fn users(&self) -> &users::UsersClient {
        &self.users
    }
}
