//! Nextcloud API client error types.

/// Errors from Nextcloud OCS API calls.
#[derive(Debug, thiserror::Error)]
pub enum NextcloudApiError {
    /// HTTP transport error.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: String,
        source: reqwest::Error,
    },
    /// Nextcloud returned a non-2xx status.
    #[error("{endpoint} returned HTTP {status}: {body}")]
    ApiError {
        endpoint: String,
        status: u16,
        body: String,
    },
    /// The HTTP call succeeded but the OCS envelope reports a failure.
    #[error("{endpoint} returned OCS status {statuscode}: {message}")]
    Ocs {
        endpoint: String,
        statuscode: i64,
        message: String,
    },
    /// Response body is not an OCS JSON document.
    #[error("failed to deserialize response from {endpoint}: {source}")]
    Deserialization {
        endpoint: String,
        source: serde_json::Error,
    },
    /// The request URL could not be built.
    #[error("cannot build request URL for {endpoint} from {base}")]
    InvalidEndpoint { endpoint: String, base: String },
}

impl NextcloudApiError {
    /// OCS status code, when the server answered with one.
    pub fn ocs_statuscode(&self) -> Option<i64> {
        match self {
            Self::Ocs { statuscode, .. } => Some(*statuscode),
            _ => None,
        }
    }
}
