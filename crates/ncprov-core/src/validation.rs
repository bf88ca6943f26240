//! # Pre-flight Validation
//!
//! Checks a whole batch of [`UserRecord`]s before any request reaches the
//! server. Nextcloud has no multi-user transaction, so a batch that fails
//! halfway leaves a partially provisioned instance; the validator is the
//! gate that prevents that.
//!
//! ## Rules
//!
//! Evaluated for every record, in this order, without stopping at the
//! first failure:
//!
//! 1. **userid**: present, a string, longer than 3 characters.
//! 2. **password**: present, a string, at least 10 characters.
//! 3. **groups**: when present, a non-empty array of non-empty strings.
//! 4. **allowed keys**: anything besides `userid`, `password` and `groups`
//!    must be one of [`ALLOWED_PROFILE_KEYS`].
//! 5. **quota**: when present, digits without a leading zero, an optional
//!    space, and `MB`, `GB` or `TB`. The empty string means "no quota".
//!
//! Diagnostics come out in record order, then rule order.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::error::json_type_name;
use crate::record::{
    UserRecord, ALLOWED_PROFILE_KEYS, GROUPS_KEY, PASSWORD_KEY, QUOTA_KEY, USERID_KEY,
};

/// A userid must be strictly longer than this.
pub const USERID_MIN_EXCLUSIVE: usize = 3;

/// A password must be at least this long.
pub const PASSWORD_MIN_LEN: usize = 10;

static QUOTA_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[1-9][0-9]* ?(?:MB|GB|TB))?$").expect("quota regex should compile")
});

/// Which rule produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    /// `userid` presence and length.
    Userid,
    /// `password` presence and length.
    Password,
    /// `groups` shape.
    Groups,
    /// Key outside the allow-list.
    UnknownKey,
    /// `quota` grammar.
    Quota,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Userid => write!(f, "userid"),
            Self::Password => write!(f, "password"),
            Self::Groups => write!(f, "groups"),
            Self::UnknownKey => write!(f, "unknown-key"),
            Self::Quota => write!(f, "quota"),
        }
    }
}

/// One rule violation, attributed to one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// 1-based position of the record in the batch.
    pub position: usize,
    /// The record's userid, when it has a string one.
    pub userid: Option<String>,
    /// The rule that fired.
    pub rule: Rule,
    /// What is wrong.
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.userid {
            Some(id) => write!(f, "user #{} ({id}): {}", self.position, self.message),
            None => write!(f, "user #{}: {}", self.position, self.message),
        }
    }
}

/// Verdict for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// True only when no record produced a diagnostic.
    pub all_valid: bool,
    /// Every violation found, in record order then rule order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationResult {
    /// Diagnostics attributed to the record at `position` (1-based).
    pub fn for_record(&self, position: usize) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(move |d| d.position == position)
    }
}

/// Validate every record of a batch.
///
/// An empty batch is vacuously valid.
pub fn validate(records: &[UserRecord]) -> ValidationResult {
    let diagnostics: Vec<Diagnostic> = records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| check_record(index + 1, record))
        .collect();

    if !diagnostics.is_empty() {
        tracing::debug!(
            records = records.len(),
            violations = diagnostics.len(),
            "user records failed validation"
        );
    }

    ValidationResult {
        all_valid: diagnostics.is_empty(),
        diagnostics,
    }
}

/// Whether `quota` satisfies the quota grammar.
pub fn is_valid_quota(quota: &str) -> bool {
    QUOTA_PATTERN.is_match(quota)
}

/// Collects diagnostics for a single record.
struct RecordCheck<'a> {
    position: usize,
    userid: Option<&'a str>,
    found: Vec<Diagnostic>,
}

impl<'a> RecordCheck<'a> {
    fn fail(&mut self, rule: Rule, message: String) {
        self.found.push(Diagnostic {
            position: self.position,
            userid: self.userid.map(str::to_string),
            rule,
            message,
        });
    }
}

fn check_record(position: usize, record: &UserRecord) -> Vec<Diagnostic> {
    let mut check = RecordCheck {
        position,
        userid: record.userid(),
        found: Vec::new(),
    };

    check_userid(&mut check, record);
    check_password(&mut check, record);
    check_groups(&mut check, record);
    check_allowed_keys(&mut check, record);
    check_quota(&mut check, record);

    check.found
}

fn check_userid(check: &mut RecordCheck<'_>, record: &UserRecord) {
    match record.get(USERID_KEY) {
        None => check.fail(Rule::Userid, "missing userid".to_string()),
        Some(Value::String(id)) if id.chars().count() <= USERID_MIN_EXCLUSIVE => check.fail(
            Rule::Userid,
            format!("invalid userid {id:?}: must be longer than {USERID_MIN_EXCLUSIVE} characters"),
        ),
        Some(Value::String(_)) => {}
        Some(other) => check.fail(
            Rule::Userid,
            format!("invalid userid: expected a string, found {}", json_type_name(other)),
        ),
    }
}

fn check_password(check: &mut RecordCheck<'_>, record: &UserRecord) {
    match record.get(PASSWORD_KEY) {
        None => check.fail(Rule::Password, "missing password".to_string()),
        Some(Value::String(pw)) => {
            let len = pw.chars().count();
            if len < PASSWORD_MIN_LEN {
                check.fail(
                    Rule::Password,
                    format!(
                        "invalid password: must be at least {PASSWORD_MIN_LEN} characters, got {len}"
                    ),
                );
            }
        }
        Some(other) => check.fail(
            Rule::Password,
            format!("invalid password: expected a string, found {}", json_type_name(other)),
        ),
    }
}

fn check_groups(check: &mut RecordCheck<'_>, record: &UserRecord) {
    let Some(groups) = record.get(GROUPS_KEY) else {
        return;
    };
    let Value::Array(entries) = groups else {
        check.fail(
            Rule::Groups,
            format!("invalid groups: expected an array, found {}", json_type_name(groups)),
        );
        return;
    };
    if entries.is_empty() {
        check.fail(
            Rule::Groups,
            "invalid groups: list must not be empty".to_string(),
        );
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Value::String(name) if name.is_empty() => check.fail(
                Rule::Groups,
                format!("invalid groups: entry {} is an empty string", index + 1),
            ),
            Value::String(_) => {}
            other => check.fail(
                Rule::Groups,
                format!(
                    "invalid groups: entry {} must be a string, found {}",
                    index + 1,
                    json_type_name(other)
                ),
            ),
        }
    }
}

fn check_allowed_keys(check: &mut RecordCheck<'_>, record: &UserRecord) {
    for key in record.keys() {
        if key == USERID_KEY || key == PASSWORD_KEY || key == GROUPS_KEY {
            continue;
        }
        if !ALLOWED_PROFILE_KEYS.contains(&key) {
            check.fail(Rule::UnknownKey, format!("invalid data key: {key}"));
        }
    }
}

fn check_quota(check: &mut RecordCheck<'_>, record: &UserRecord) {
    match record.get(QUOTA_KEY) {
        None => {}
        Some(Value::String(quota)) if is_valid_quota(quota) => {}
        Some(Value::String(quota)) => check.fail(
            Rule::Quota,
            format!("invalid quota {quota:?}: expected a size such as \"10GB\" or \"512 MB\""),
        ),
        Some(other) => check.fail(
            Rule::Quota,
            format!("invalid quota: expected a string, found {}", json_type_name(other)),
        ),
    }
}
