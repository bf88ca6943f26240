//! OCS response envelope.
//!
//! Every OCS endpoint answers with
//!
//! ```json
//! { "ocs": { "meta": { "status": "ok", "statuscode": 100, "message": "OK" }, "data": { } } }
//! ```
//!
//! With the v1 API a failed operation still comes back as HTTP 200; the
//! outcome is in `meta.statuscode`, where `100` means success.

use serde::Deserialize;

/// `meta.statuscode` value meaning success on the v1 API.
pub const OCS_OK: i64 = 100;

/// Returned by [`OcsResponse::statuscode`] when the envelope has none.
pub const OCS_STATUS_MISSING: i64 = -1;

/// Top-level OCS document. Every level is optional so that partial or
/// unexpected bodies still deserialize.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcsResponse {
    #[serde(default)]
    pub ocs: Option<OcsEnvelope>,
}

/// The `ocs` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcsEnvelope {
    #[serde(default)]
    pub meta: Option<OcsMeta>,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The `ocs.meta` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OcsMeta {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub statuscode: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

impl OcsResponse {
    fn meta(&self) -> Option<&OcsMeta> {
        self.ocs.as_ref().and_then(|ocs| ocs.meta.as_ref())
    }

    /// `ocs.meta.statuscode`, or [`OCS_STATUS_MISSING`].
    pub fn statuscode(&self) -> i64 {
        self.meta()
            .and_then(|meta| meta.statuscode)
            .unwrap_or(OCS_STATUS_MISSING)
    }

    /// `ocs.meta.message`, or the empty string.
    pub fn message(&self) -> &str {
        self.meta()
            .and_then(|meta| meta.message.as_deref())
            .unwrap_or("")
    }

    /// Whether the envelope reports success.
    pub fn is_ok(&self) -> bool {
        self.statuscode() == OCS_OK
    }
}
