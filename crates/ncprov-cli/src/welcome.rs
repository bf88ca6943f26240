//! # Welcome Subcommand
//!
//! (Re)sends the welcome email to every user in the file.

use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use ncprov_client::SendWelcomeEmail;
use ncprov_core::{run_batch, BatchOptions};

use crate::common::{connect, prepare_batch, RemoteArgs};
use crate::credentials::obtain_credentials;
use crate::report::finish;
use crate::EXIT_ABORTED;

/// Printed when validation stops the batch.
pub const ABORT_MESSAGE: &str = "Aborted. No emails have been sent.";

/// Arguments for the welcome subcommand.
#[derive(Args, Debug)]
pub struct WelcomeArgs {
    #[command(flatten)]
    pub remote: RemoteArgs,
}

/// Execute the welcome subcommand.
pub async fn run_welcome(args: &WelcomeArgs) -> Result<u8> {
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
    }

    let options = BatchOptions {
        dry_run: remote.dry_run,
        max_concurrency: remote.concurrency,
    };
    let outcomes = run_batch(&records, Arc::new(SendWelcomeEmail::new(client)), options).await;
    Ok(finish(&outcomes))
}
