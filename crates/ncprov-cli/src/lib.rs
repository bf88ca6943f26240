//! # ncprov-cli: Nextcloud bulk provisioning CLI
//!
//! Provides the `ncprov` command-line interface.
//!
//! ## Subcommands
//!
//! - `ncprov add <users.json> <nextcloud-url>`: create every user in the file.
//! - `ncprov welcome <users.json> <nextcloud-url>`: send welcome emails.
//! - `ncprov setting <users.json> <key> <value>`: print `occ user:setting`
//!   commands for every user.
//! - `ncprov validate <users.json>`: check the file without touching a server.
//!
//! Every subcommand validates the whole file first. If any record is
//! invalid, all diagnostics are printed and nothing is sent.
//!
//! ## Exit codes
//!
//! - `0`: every record succeeded (or nothing needed to run).
//! - `1`: the batch never started: unreadable file, invalid records,
//!   missing credentials, unreachable API.
//! - `2`: the batch ran but at least one record failed.

pub mod add;
pub mod common;
pub mod credentials;
pub mod loader;
pub mod occ;
pub mod report;
pub mod setting;
pub mod validate;
pub mod welcome;

/// Exit code when everything succeeded.
pub const EXIT_OK: u8 = 0;
/// Exit code when the batch was aborted before dispatch.
pub const EXIT_ABORTED: u8 = 1;
/// Exit code when some records failed.
pub const EXIT_PARTIAL_FAILURE: u8 = 2;
