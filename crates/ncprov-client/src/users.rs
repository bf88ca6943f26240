//! Typed client for the OCS user provisioning API.
//!
//! Base path: `{base_url}/ocs/v1.php/cloud`
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/users` | List users (used as a reachability and auth check) |
//! | POST   | `/users?groups[]=..` | Create user (form: `userid`, `password`) |
//! | PUT    | `/users/{userid}` | Update one profile field (form: `key`, `value`) |
//! | POST   | `/users/{userid}/welcome` | Resend the welcome email |

use std::sync::Arc;

use url::Url;
use zeroize::Zeroizing;

use crate::error::NextcloudApiError;
use crate::ocs::OcsResponse;

/// Path segments of the provisioning API below the instance root.
const API_SEGMENTS: &[&str] = &["ocs", "v1.php", "cloud"];

/// Admin credentials shared by every request.
#[derive(Clone)]
pub(crate) struct BasicAuth {
    pub(crate) username: String,
    pub(crate) password: Zeroizing<String>,
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Request to create a user.
#[derive(Debug)]
pub struct CreateUserRequest<'a> {
    pub userid: &'a str,
    pub password: &'a str,
    pub groups: Vec<&'a str>,
}

/// Client for the OCS users endpoints.
#[derive(Debug, Clone)]
pub struct UsersClient {
    http: reqwest::Client,
    api_base: Url,
    auth: Arc<BasicAuth>,
}

impl UsersClient {
    pub(crate) fn new(
        http: reqwest::Client,
        base_url: &Url,
        auth: Arc<BasicAuth>,
    ) -> Result<Self, NextcloudApiError> {
        let api_base = append_segments(base_url, API_SEGMENTS)?;
        Ok(Self {
            http,
            api_base,
            auth,
        })
    }

    /// The resolved provisioning API root.
    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Check that the API answers and accepts the admin credentials.
    ///
    /// Calls `GET {api}/users`.
    pub async fn check_api(&self) -> Result<(), NextcloudApiError> {
        let endpoint = "GET /users";
        let url = append_segments(&self.api_base, &["users"])?;

        let resp = crate::retry::retry_send(|| self.authed(self.http.get(url.clone())).send())
            .await
            .map_err(|e| NextcloudApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        expect_ocs_ok(endpoint, resp).await.map(drop)
    }

    /// Create a user, optionally adding it to groups.
    ///
    /// Calls `POST {api}/users?groups[]=..`. Never retried: a lost response
    /// after a successful create must not turn into a second attempt.
    pub async fn create_user(&self, req: &CreateUserRequest<'_>) -> Result<(), NextcloudApiError> {
        let endpoint = "POST /users";
        let mut url = append_segments(&self.api_base, &["users"])?;
        if !req.groups.is_empty() {
            let mut query = url.query_pairs_mut();
            for group in &req.groups {
                query.append_pair("groups[]", group);
            }
        }

        let resp = self
            .authed(self.http.post(url))
            .form(&[("userid", req.userid), ("password", req.password)])
            .send()
            .await
            .map_err(|e| NextcloudApiError::Http {
                endpoint: endpoint.into(),
                source: e,
            })?;

        expect_ocs_ok(endpoint, resp).await.map(drop)
    }

    /// Set one profile field of an existing user.
    ///
    /// Calls `PUT {api}/users/{userid}`.
    pub async fn update_user_field(
        &self,
        userid: &str,
        key: &str,
        value: &str,
    ) -> Result<(), NextcloudApiError> {
        let endpoint = format!("PUT /users/{userid} ({key})");
        let url = append_segments(&self.api_base, &["users", userid])?;
        let form = [("key", key), ("value", value)];

        let resp = crate::retry::retry_send(|| {
            self.authed(self.http.put(url.clone())).form(&form).send()
        })
        .await
        .map_err(|e| NextcloudApiError::Http {
            endpoint: endpoint.clone(),
            source: e,
        })?;

        expect_ocs_ok(&endpoint, resp).await.map(drop)
    }

    /// Ask the server to send the welcome email for `userid`.
    ///
    /// Calls `POST {api}/users/{userid}/welcome`. Not retried.
    pub async fn send_welcome_email(&self, userid: &str) -> Result<(), NextcloudApiError> {
        let endpoint = format!("POST /users/{userid}/welcome");
        let url = append_segments(&self.api_base, &["users", userid, "welcome"])?;

        let resp = self
            .authed(self.http.post(url))
            .send()
            .await
            .map_err(|e| NextcloudApiError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        expect_ocs_ok(&endpoint, resp).await.map(drop)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.basic_auth(&self.auth.username, Some(self.auth.password.as_str()))
    }
}

/// Append percent-encoded path segments to `base`.
fn append_segments(base: &Url, segments: &[&str]) -> Result<Url, NextcloudApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| NextcloudApiError::InvalidEndpoint {
            endpoint: segments.join("/"),
            base: base.to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Require HTTP 2xx and OCS status 100.
async fn expect_ocs_ok(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<OcsResponse, NextcloudApiError> {
    let status = resp.status();
    let body = resp.text().await.map_err(|e| NextcloudApiError::Http {
        endpoint: endpoint.into(),
        source: e,
    })?;

    if !status.is_success() {
        return Err(NextcloudApiError::ApiError {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            body,
        });
    }

    let parsed: OcsResponse =
        serde_json::from_str(&body).map_err(|e| NextcloudApiError::Deserialization {
            endpoint: endpoint.into(),
            source: e,
        })?;

    if !parsed.is_ok() {
        return Err(NextcloudApiError::Ocs {
            endpoint: endpoint.into(),
            statuscode: parsed.statuscode(),
            message: parsed.message().to_string(),
        });
    }

    tracing::trace!(endpoint, "OCS call succeeded");
    Ok(parsed)
}
