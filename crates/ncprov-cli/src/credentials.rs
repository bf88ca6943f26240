//! Admin credentials for the target instance.
//!
//! Taken from `NEXTCLOUD_USER` / `NEXTCLOUD_PASSWORD` when both are set,
//! otherwise asked for interactively.

use anyhow::{bail, Context, Result};
use dialoguer::{Input, Password};
use zeroize::Zeroizing;

use ncprov_client::config::{credentials_from_env, PASSWORD_VAR, USER_VAR};

/// Admin login and password.
pub struct Credentials {
    pub username: String,
    pub password: Zeroizing<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Resolve credentials from the environment, or prompt unless
/// `non_interactive` is set.
pub fn obtain_credentials(non_interactive: bool) -> Result<Credentials> {
    if let Some((username, password)) = credentials_from_env() {
        tracing::debug!(username = %username, "using credentials from environment");
        return Ok(Credentials { username, password });
    }
    if non_interactive {
        bail!("{USER_VAR} and {PASSWORD_VAR} must be set when running non-interactively");
    }
    prompt_credentials()
}

fn prompt_credentials() -> Result<Credentials> {
    let username: String = Input::new()
        .with_prompt("Your Nextcloud username")
        .interact_text()
        .context("prompt failed")?;
    let password = Password::new()
        .with_prompt("Your Nextcloud password")
        .interact()
        .context("prompt failed")?;
    Ok(Credentials {
        username,
        password: Zeroizing::new(password),
    })
}
