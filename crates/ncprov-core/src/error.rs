//! # Error Types
//!
//! Only two things in the core can fail outright: reading the record
//! container, and a single record's action. Per-field problems are not
//! errors here; they are reported as validation diagnostics.

use thiserror::Error;

/// The record source could not produce a sequence of user records.
///
/// Any of these aborts the whole batch before validation starts.
#[derive(Error, Debug)]
pub enum RecordSourceError {
    /// The input is not valid JSON.
    #[error("could not parse user records: {0}")]
    Parse(#[from] serde_json::Error),

    /// The top-level JSON value is not an array.
    #[error("JSON document must be an array of users, found {found}")]
    NotASequence {
        /// JSON type name of the value that was found instead.
        found: &'static str,
    },

    /// An array element is not a JSON object.
    #[error("user record #{position} must be a JSON object, found {found}")]
    NotAnObject {
        /// 1-based position of the offending element.
        position: usize,
        /// JSON type name of the element.
        found: &'static str,
    },
}

/// A single record's action failed.
///
/// Converted into a failed [`crate::Outcome`] by the batch dispatcher; it
/// never stops sibling records.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The remote service rejected or could not process the request.
    #[error("{0}")]
    Remote(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The record lacks data the action needs. Should not happen after a
    /// passing validation.
    #[error("record is missing {0}")]
    MissingField(&'static str),

    /// The task running the action panicked or was cancelled.
    #[error("action task aborted: {0}")]
    Aborted(String),
}

impl ActionError {
    /// Wrap any error type coming out of an adapter.
    pub fn remote<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Remote(Box::new(err))
    }
}

/// JSON type name used in error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
