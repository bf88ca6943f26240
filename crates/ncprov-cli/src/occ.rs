//! `occ user:setting` command formatting.
//!
//! Prints the server-side command that sets one preference for a user,
//! for admins who prefer running `occ` on the host over the API:
//!
//! ```text
//! sudo -u www-data php occ user:setting "alice" files quota "10 GB"
//! ```

use async_trait::async_trait;
use ncprov_core::{ActionError, RecordAction, UserRecord};

/// Default account the web server runs as.
pub const DEFAULT_WEB_USER: &str = "www-data";

/// Default path to the `occ` script, relative to the Nextcloud root.
pub const DEFAULT_OCC_PATH: &str = "occ";

/// Emits one `occ user:setting` command per record.
#[derive(Debug, Clone)]
pub struct SettingCommand {
    pub key: String,
    pub value: String,
    pub web_user: String,
    pub occ_path: String,
}

impl SettingCommand {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            web_user: DEFAULT_WEB_USER.to_string(),
            occ_path: DEFAULT_OCC_PATH.to_string(),
        }
    }

    /// The command line for `userid`.
    pub fn command_for(&self, userid: &str) -> String {
        format!(
            "sudo -u {} php {} user:setting {} {} {}",
            shell_word(&self.web_user),
            shell_word(&self.occ_path),
            double_quote(userid),
            shell_word(&self.key),
            double_quote(&self.value),
        )
    }
}

#[async_trait]
impl RecordAction for SettingCommand {
    fn name(&self) -> &str {
        "setting-command"
    }

    fn describe(&self, record: &UserRecord) -> String {
        self.command_for(&record.label())
    }

    async fn apply(&self, record: &UserRecord) -> Result<String, ActionError> {
        let userid = record.userid().ok_or(ActionError::MissingField("userid"))?;
        Ok(self.command_for(userid))
    }
}

/// Wrap in double quotes, escaping what the shell would still expand.
fn double_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Bare word if it needs no quoting, double-quoted otherwise.
fn shell_word(s: &str) -> String {
    let plain = !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':'));
    if plain {
        s.to_string()
    } else {
        double_quote(s)
    }
}
