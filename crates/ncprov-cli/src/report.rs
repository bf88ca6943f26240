//! Terminal output for diagnostics and batch outcomes.
//!
//! Results go to stdout, failures and diagnostics to stderr, so the output
//! of `ncprov setting` can be piped straight into a shell.

use ncprov_core::{BatchSummary, Outcome, OutcomeStatus, ValidationResult};

use crate::{EXIT_OK, EXIT_PARTIAL_FAILURE};

/// Print every diagnostic, one per line.
pub fn print_diagnostics(result: &ValidationResult) {
    for diagnostic in &result.diagnostics {
        eprintln!("{diagnostic}");
    }
}

/// Print every outcome in record order.
pub fn print_outcomes(outcomes: &[Outcome]) {
    for outcome in outcomes {
        match outcome.status {
            OutcomeStatus::Failed => eprintln!("{outcome}"),
            OutcomeStatus::Succeeded | OutcomeStatus::Skipped => println!("{outcome}"),
        }
    }
}

/// Print outcomes plus a one-line tally when something failed, and return
/// the process exit code.
pub fn finish(outcomes: &[Outcome]) -> u8 {
    print_outcomes(outcomes);
    let summary = BatchSummary::from_outcomes(outcomes);
    if !summary.all_succeeded() {
        eprintln!(
            "{} of {} users failed",
            summary.failed,
            summary.total()
        );
    }
    exit_code(&summary)
}

/// `0` when no record failed, `2` otherwise.
pub fn exit_code(summary: &BatchSummary) -> u8 {
    if summary.all_succeeded() {
        EXIT_OK
    } else {
        EXIT_PARTIAL_FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_code_reflects_failures() {
        let ok = [Outcome::succeeded("alice", "Created new user alice")];
        let mixed = [
            Outcome::succeeded("alice", "Created new user alice"),
            Outcome::failed("bobby", "boom"),
        ];
        assert_eq!(exit_code(&BatchSummary::from_outcomes(&ok)), EXIT_OK);
        assert_eq!(
            exit_code(&BatchSummary::from_outcomes(&mixed)),
            EXIT_PARTIAL_FAILURE
        );
    }

    #[test]
    fn skipped_outcomes_do_not_fail_the_run() {
        let dry = [Outcome::skipped("alice", "Dry run => this would create user alice")];
        assert_eq!(finish(&dry), EXIT_OK);
    }
}
