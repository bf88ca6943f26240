//! Nextcloud client configuration.
//!
//! The base URL normally comes from the command line and the credentials
//! from an interactive prompt; every field can also be supplied through the
//! environment for unattended runs.

use url::Url;
use zeroize::Zeroizing;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Environment variable holding the instance URL.
pub const URL_VAR: &str = "NEXTCLOUD_URL";
/// Environment variable holding the admin login.
pub const USER_VAR: &str = "NEXTCLOUD_USER";
/// Environment variable holding the admin password.
pub const PASSWORD_VAR: &str = "NEXTCLOUD_PASSWORD";
/// Environment variable holding the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "NEXTCLOUD_TIMEOUT_SECS";

/// Configuration for talking to one Nextcloud instance.
///
/// Custom `Debug` implementation redacts the `password` field
/// to prevent credential leakage in log output.
#[derive(Clone)]
pub struct NextcloudConfig {
    /// Root URL of the Nextcloud installation (not the OCS endpoint).
    pub base_url: Url,
    /// Admin login used for HTTP basic auth.
    pub username: String,
    /// Admin password (or app password).
    pub password: Zeroizing<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for NextcloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NextcloudConfig")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl NextcloudConfig {
    /// Build a configuration from explicit values. The timeout is taken
    /// from `NEXTCLOUD_TIMEOUT_SECS` when set, else the default.
    pub fn new(
        base_url: &str,
        username: impl Into<String>,
        password: Zeroizing<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            username: username.into(),
            password,
            timeout_secs: env_timeout(),
        })
    }
}

/// Admin credentials from `NEXTCLOUD_USER` / `NEXTCLOUD_PASSWORD`, if both
/// are set and non-empty.
pub fn credentials_from_env() -> Option<(String, Zeroizing<String>)> {
    let user = std::env::var(USER_VAR).ok().filter(|u| !u.is_empty())?;
    let password = std::env::var(PASSWORD_VAR).ok().filter(|p| !p.is_empty())?;
    Some((user, Zeroizing::new(password)))
}

/// Parse and check an instance URL. Only `http` and `https` are accepted.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn env_timeout() -> u64 {
    std::env::var(TIMEOUT_VAR)
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid Nextcloud URL {0:?}: {1}")]
    InvalidUrl(String, String),
    #[error("unsupported URL scheme {0:?}: expected http or https")]
    UnsupportedScheme(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_parses_url_and_keeps_credentials() {
        let cfg = NextcloudConfig::new(
            "https://cloud.example.org/nextcloud",
            "admin",
            Zeroizing::new("s3cret".to_string()),
        )
        .unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://cloud.example.org/nextcloud");
        assert_eq!(cfg.username, "admin");
        assert_eq!(cfg.password.as_str(), "s3cret");
        assert!(cfg.timeout_secs > 0);
    }

    #[test]
    fn debug_redacts_password() {
        let cfg = NextcloudConfig::new(
            "https://cloud.example.org",
            "admin",
            Zeroizing::new("s3cret".to_string()),
        )
        .unwrap();
        let debug = format!("{cfg:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }

    #[test]
    fn parse_base_url_rejects_non_http_schemes() {
        assert!(matches!(
            parse_base_url("ftp://cloud.example.org"),
            Err(ConfigError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn parse_base_url_trims_whitespace() {
        let url = parse_base_url("  http://localhost:8080/ ").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/");
    }
}
