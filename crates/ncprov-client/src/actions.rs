//! Per-record actions backed by the OCS client.
//!
//! Each action takes one validated [`UserRecord`] and performs its effect
//! against the server. Errors are returned as [`ActionError`]s and become
//! failed outcomes in the batch; they never abort sibling records.

use std::sync::Arc;

use async_trait::async_trait;
use ncprov_core::{ActionError, RecordAction, UserRecord};

use crate::users::CreateUserRequest;
use crate::NextcloudClient;

/// Creates the account, then applies each profile field present on the
/// record, one update call per field.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    client: Arc<NextcloudClient>,
}

impl CreateAccount {
    pub fn new(client: Arc<NextcloudClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordAction for CreateAccount {
    fn name(&self) -> &str {
        "create-account"
    }

    fn describe(&self, record: &UserRecord) -> String {
        format!("Dry run => this would create user {}", record.label())
    }

    async fn apply(&self, record: &UserRecord) -> Result<String, ActionError> {
        let userid = record.userid().ok_or(ActionError::MissingField("userid"))?;
        let password = record
            .password()
            .ok_or(ActionError::MissingField("password"))?;

        tracing::info!(userid, "adding user");
        let request = CreateUserRequest {
            userid,
            password,
            groups: record.groups(),
        };
        self.client
            .users()
            .create_user(&request)
            .await
            .map_err(ActionError::remote)?;

        let fields = record.profile_fields();
        if !fields.is_empty() {
            tracing::info!(userid, fields = fields.len(), "updating user profile settings");
        }
        for (key, value) in &fields {
            self.client
                .users()
                .update_user_field(userid, key, value)
                .await
                .map_err(ActionError::remote)?;
        }

        Ok(format!("Created new user {userid}"))
    }
}

/// Asks the server to send the welcome email to the record's user.
#[derive(Debug, Clone)]
pub struct SendWelcomeEmail {
    client: Arc<NextcloudClient>,
}

impl SendWelcomeEmail {
    pub fn new(client: Arc<NextcloudClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordAction for SendWelcomeEmail {
    fn name(&self) -> &str {
        "send-welcome-email"
    }

    fn describe(&self, record: &UserRecord) -> String {
        format!(
            "Dry run => this would send a welcome mail to {}",
            record.label()
        )
    }

    async fn apply(&self, record: &UserRecord) -> Result<String, ActionError> {
        let userid = record.userid().ok_or(ActionError::MissingField("userid"))?;
        self.client
            .users()
            .send_welcome_email(userid)
            .await
            .map_err(ActionError::remote)?;
        Ok(format!("Sent mail to {userid}"))
    }
}
