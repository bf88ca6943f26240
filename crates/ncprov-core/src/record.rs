//! # User Records
//!
//! A [`UserRecord`] is one entry of the users file. It keeps the parsed
//! JSON object as-is so that the validator can see unknown keys and wrongly
//! typed values; typed accessors give the action adapters the view they
//! need once the batch has passed validation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{json_type_name, RecordSourceError};

/// Key holding the login name.
pub const USERID_KEY: &str = "userid";
/// Key holding the initial password.
pub const PASSWORD_KEY: &str = "password";
/// Key holding the group memberships.
pub const GROUPS_KEY: &str = "groups";
/// Key holding the storage quota.
pub const QUOTA_KEY: &str = "quota";

/// Profile fields a record may carry besides `userid`, `password` and
/// `groups`. Order matters: profile updates are sent in this order.
pub const ALLOWED_PROFILE_KEYS: &[&str] = &[
    "email",
    QUOTA_KEY,
    "displayname",
    "phone",
    "address",
    "website",
    "twitter",
];

/// One user definition from the records file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRecord {
    fields: Map<String, Value>,
}

impl UserRecord {
    /// Wrap an already parsed JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Raw value for `key`, if the key is present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Keys in the order they appeared in the source document.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The `userid`, when present and a string.
    pub fn userid(&self) -> Option<&str> {
        self.fields.get(USERID_KEY).and_then(Value::as_str)
    }

    /// The `password`, when present and a string.
    pub fn password(&self) -> Option<&str> {
        self.fields.get(PASSWORD_KEY).and_then(Value::as_str)
    }

    /// Group names. Absent key, or non-string entries, are skipped.
    pub fn groups(&self) -> Vec<&str> {
        self.fields
            .get(GROUPS_KEY)
            .and_then(Value::as_array)
            .map(|groups| groups.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Profile fields present on this record, in [`ALLOWED_PROFILE_KEYS`]
    /// order, with values rendered as the strings sent to the server.
    pub fn profile_fields(&self) -> Vec<(&'static str, String)> {
        ALLOWED_PROFILE_KEYS
            .iter()
            .filter_map(|key| {
                self.fields
                    .get(*key)
                    .map(|value| (*key, render_field_value(value)))
            })
            .collect()
    }

    /// Label used in log lines and outcomes: the userid, or a placeholder.
    pub fn label(&self) -> String {
        match self.userid() {
            Some(id) => id.to_string(),
            None => "<missing userid>".to_string(),
        }
    }
}

impl From<Map<String, Value>> for UserRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Strings are sent verbatim; other scalars as their JSON text.
fn render_field_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Parse a users document into records.
///
/// The document must be a JSON array whose elements are all objects.
/// Anything else is a structural failure for the whole batch.
pub fn parse_records(input: &str) -> Result<Vec<UserRecord>, RecordSourceError> {
    let document: Value = serde_json::from_str(input)?;
    let Value::Array(items) = document else {
        return Err(RecordSourceError::NotASequence {
            found: json_type_name(&document),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(fields) => Ok(UserRecord::new(fields)),
            other => Err(RecordSourceError::NotAnObject {
                position: index + 1,
                found: json_type_name(&other),
            }),
        })
        .collect()
}
