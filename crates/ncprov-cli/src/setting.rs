//! # Setting Subcommand
//!
//! Prints one `occ user:setting` command per user. Nothing is executed.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use ncprov_core::{run_batch, BatchOptions};

use crate::common::prepare_batch;
use crate::occ::{SettingCommand, DEFAULT_OCC_PATH, DEFAULT_WEB_USER};
use crate::report::finish;
use crate::EXIT_ABORTED;

/// Printed when validation stops the batch.
pub const ABORT_MESSAGE: &str = "Aborted. No commands have been printed.";

/// Arguments for the setting subcommand.
#[derive(Args, Debug)]
pub struct SettingArgs {
    /// JSON file holding an array of user objects.
    pub users_file: PathBuf,

    /// Setting key, e.g. `files`.
    pub key: String,

    /// Setting value, e.g. `quota`.
    pub value: String,

    /// Account the web server runs as.
    #[arg(long, default_value = DEFAULT_WEB_USER)]
    pub web_user: String,

    /// Path to the `occ` script.
    #[arg(long = "occ", default_value = DEFAULT_OCC_PATH)]
    pub occ_path: String,
}

/// Execute the setting subcommand.
pub async fn run_setting(args: &SettingArgs) -> Result<u8> {
    let Some(records) = prepare_batch(&args.users_file, ABORT_MESSAGE)? else {
        return Ok(EXIT_ABORTED);
    };

    let action = SettingCommand {
        web_user: args.web_user.clone(),
        occ_path: args.occ_path.clone(),
        ..SettingCommand::new(&args.key, &args.value)
    };
    let outcomes = run_batch(&records, Arc::new(action), BatchOptions::default()).await;
    Ok(finish(&outcomes))
}
