//! # Batch Dispatch
//!
//! Runs one [`RecordAction`] per record of an already validated batch.
//!
//! Every record gets its own tokio task, spawned in record order; a
//! semaphore bounds how many are in flight. The dispatcher waits for all of
//! them and returns one [`Outcome`] per record, in record order. A failure
//! (or panic) in one record's action is recorded for that record only.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::Semaphore;

use crate::error::ActionError;
use crate::record::UserRecord;

/// Default number of actions allowed in flight at once.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// A side-effecting operation applied to one record.
///
/// Implementations must be shareable across tasks.
#[async_trait]
pub trait RecordAction: Send + Sync {
    /// Short name used in logs (e.g. "create-account").
    fn name(&self) -> &str;

    /// What [`apply`](Self::apply) would do, for dry runs.
    fn describe(&self, record: &UserRecord) -> String;

    /// Perform the action. `Ok` carries the success line to report.
    async fn apply(&self, record: &UserRecord) -> Result<String, ActionError>;
}

/// Dispatch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    /// Describe each action instead of performing it.
    pub dry_run: bool,
    /// Upper bound on actions in flight. Zero is treated as one.
    pub max_concurrency: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

/// How a record's action ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// The action ran and succeeded.
    Succeeded,
    /// The action ran and failed.
    Failed,
    /// Dry run; the action was not invoked.
    Skipped,
}

/// Result of one record's action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// The record's userid (or a placeholder if it has none).
    pub userid: String,
    /// How the action ended.
    pub status: OutcomeStatus,
    /// Success line, failure reason, or dry-run description.
    pub message: String,
}

impl Outcome {
    /// A successful action.
    pub fn succeeded(userid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            status: OutcomeStatus::Succeeded,
            message: message.into(),
        }
    }

    /// A failed action.
    pub fn failed(userid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            status: OutcomeStatus::Failed,
            message: message.into(),
        }
    }

    /// A dry-run description.
    pub fn skipped(userid: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            userid: userid.into(),
            status: OutcomeStatus::Skipped,
            message: message.into(),
        }
    }

    /// True unless the action failed. Dry-run outcomes count as success.
    pub fn is_success(&self) -> bool {
        self.status != OutcomeStatus::Failed
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            OutcomeStatus::Failed => write!(f, "{}: {}", self.userid, self.message),
            OutcomeStatus::Succeeded | OutcomeStatus::Skipped => write!(f, "{}", self.message),
        }
    }
}

/// Counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchSummary {
    /// Tally a list of outcomes.
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        outcomes
            .iter()
            .fold(Self::default(), |mut summary, outcome| {
                match outcome.status {
                    OutcomeStatus::Succeeded => summary.succeeded += 1,
                    OutcomeStatus::Failed => summary.failed += 1,
                    OutcomeStatus::Skipped => summary.skipped += 1,
                }
                summary
            })
    }

    /// Total number of records.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed + self.skipped
    }

    /// Whether no record failed.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// Apply `action` to every record.
///
/// The caller must have validated `records` first; nothing is re-checked
/// here. Must be called from within a tokio runtime.
pub async fn run_batch(
    records: &[UserRecord],
    action: Arc<dyn RecordAction>,
    options: BatchOptions,
) -> Vec<Outcome> {
    if options.dry_run {
        return records
            .iter()
            .map(|record| Outcome::skipped(record.label(), action.describe(record)))
            .collect();
    }

    let permits = Arc::new(Semaphore::new(options.max_concurrency.max(1)));
    tracing::info!(
        action = action.name(),
        records = records.len(),
        max_concurrency = options.max_concurrency.max(1),
        "dispatching batch"
    );

    let handles: Vec<_> = records
        .iter()
        .cloned()
        .map(|record| {
            let action = Arc::clone(&action);
            let permits = Arc::clone(&permits);
            tokio::spawn(async move {
                // Never closed; a failed acquire is reported like any action error.
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| ActionError::Aborted(e.to_string()))?;
                tracing::debug!(action = action.name(), userid = %record.label(), "applying action");
                action.apply(&record).await
            })
        })
        .collect();

    let mut outcomes = Vec::with_capacity(records.len());
    for (record, handle) in records.iter().zip(handles) {
        let userid = record.label();
        let outcome = match handle.await {
            Ok(Ok(message)) => Outcome::succeeded(userid, message),
            Ok(Err(err)) => {
                tracing::warn!(action = action.name(), userid = %userid, "action failed: {err}");
                Outcome::failed(userid, err.to_string())
            }
            Err(join_err) => {
                let err = ActionError::Aborted(join_err.to_string());
                tracing::error!(action = action.name(), userid = %userid, "{err}");
                Outcome::failed(userid, err.to_string())
            }
        };
        outcomes.push(outcome);
    }

    let summary = BatchSummary::from_outcomes(&outcomes);
    tracing::info!(
        action = action.name(),
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch complete"
    );
    outcomes
}
