//! # Add Subcommand
//!
//! Creates every user in the file, then applies their profile fields.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use ncprov_client::CreateAccount;
use ncprov_core::{run_batch, BatchOptions};

use crate::common::{connect, prepare_batch, RemoteArgs};
use crate::credentials::obtain_credentials;
use crate::report::finish;
use crate::EXIT_ABORTED;

/// Printed when validation stops the batch.
pub const ABORT_MESSAGE: &str = "Aborted. No users have been created.";

/// Arguments for the add subcommand.
#[derive(Args, Debug)]
pub struct AddArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
}

/// Execute the add subcommand.
pub async fn run_add(args: &AddArgs) -> Result<u8> {
    let remote = &args.remote;
    let Some(records) = prepare_batch(&remote.users_file, ABORT_MESSAGE)? else {
        return Ok(EXIT_ABORTED);
    };

    let credentials = obtain_credentials(remote.non_interactive)?;
    let client = connect(&remote.nextcloud_url, credentials)?;

    if remote.dry_run {
        println!(
            "This is a dry run; no request will be sent to {}",
            remote.nextcloud_url
        );
    } else {
        client
            .users()
            .check_api()
            .await
            .with_context(|| format!("could not connect to the API on {}", remote.nextcloud_url))?;
        tracing::info!(api = %client.users().api_base(), "API reachable");
    }

    let options = BatchOptions {
        dry_run: remote.dry_run,
        max_concurrency: remote.concurrency,
    };
    let outcomes = run_batch(&records, Arc::new(CreateAccount::new(client)), options).await;
    Ok(finish(&outcomes))
}
