//! # ncprov-core: Records, Validation, and Batch Dispatch
//!
//! The core of `ncprov` decides whether a batch of user records is fit to be
//! sent to a Nextcloud instance, and then fans out one action per record.
//! It performs no network or file I/O of its own.
//!
//! ## Flow
//!
//! ```text
//! raw JSON ──parse_records──▶ Vec<UserRecord> ──validate──▶ ValidationResult
//!                                                              │
//!                                      all_valid? ─────────────┘
//!                                          │
//!                                          ▼
//!                         run_batch(records, action, options) ──▶ Vec<Outcome>
//! ```
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ncprov-*` crates.
//! - Validation never fails with an error: every violation becomes a
//!   [`Diagnostic`].
//! - The batch dispatcher never fails either: every record gets an
//!   [`Outcome`], whatever its action did.

pub mod batch;
pub mod error;
pub mod record;
pub mod validation;

pub use batch::{
    run_batch, BatchOptions, BatchSummary, Outcome, OutcomeStatus, RecordAction,
    DEFAULT_MAX_CONCURRENCY,
};
pub use error::{ActionError, RecordSourceError};
pub use record::{parse_records, UserRecord, ALLOWED_PROFILE_KEYS};
pub use validation::{is_valid_quota, validate, Diagnostic, Rule, ValidationResult};
