//! Plumbing shared by the subcommands that run a batch.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Args;
use ncprov_client::config::URL_VAR;
use ncprov_client::{NextcloudClient, NextcloudConfig};
use ncprov_core::{validate, UserRecord, DEFAULT_MAX_CONCURRENCY};

use crate::credentials::Credentials;
use crate::loader::load_records;
use crate::report::print_diagnostics;

/// Arguments shared by the subcommands that talk to a Nextcloud instance.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// JSON file holding an array of user objects.
    pub users_file: PathBuf,

    /// Root URL of the Nextcloud instance, e.g. `https://cloud.example.org`.
    #[arg(env = URL_VAR)]
    pub nextcloud_url: String,

    /// Print what would be done without sending any request.
    #[arg(long)]
    pub dry_run: bool,

    /// Maximum number of users processed at the same time.
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY, env = "NCPROV_CONCURRENCY")]
    pub concurrency: usize,

    /// Fail instead of prompting when credentials are not in the environment.
    #[arg(long)]
    pub non_interactive: bool,
}

/// Load and validate the users file.
///
/// Returns `Ok(None)` when at least one record is invalid, after printing
/// every diagnostic and `abort_message` to stderr. An unreadable file or an
/// empty batch is an error.
pub fn prepare_batch(path: &Path, abort_message: &str) -> Result<Option<Vec<UserRecord>>> {
    let records = load_records(path)?;
    if records.is_empty() {
        bail!("{} contains no users", path.display());
    }

    let result = validate(&records);
    if !result.all_valid {
        print_diagnostics(&result);
        eprintln!("{abort_message}");
        return Ok(None);
    }
    Ok(Some(records))
}

/// Build a client for `url`. No request is sent.
pub fn connect(url: &str, credentials: Credentials) -> Result<Arc<NextcloudClient>> {
    let config = NextcloudConfig::new(url, credentials.username, credentials.password)
        .with_context(|| format!("invalid Nextcloud URL {url:?}"))?;
    tracing::debug!(?config, "building Nextcloud client");
    let client = NextcloudClient::new(config).context("could not build HTTP client")?;
    Ok(Arc::new(client))
}
