//! # Validate Subcommand
//!
//! Checks a users file without contacting any server.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use ncprov_core::validate;

use crate::loader::load_records;
use crate::report::print_diagnostics;
use crate::{EXIT_ABORTED, EXIT_OK};

/// Output format for validation results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// JSON file holding an array of user objects.
    pub users_file: PathBuf,

    /// Print the result as text or as a JSON document.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    run_validate_to(args, &mut std::io::stdout().lock())
}

/// Execute the validate subcommand, writing the result to `out`.
/// Text-mode diagnostics still go to stderr.
pub fn run_validate_to(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    let records = load_records(&args.users_file)?;
    let result = validate(&records);

    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &result)
                .context("could not serialize validation result")?;
            writeln!(out)?;
        }
        OutputFormat::Text if result.all_valid => {
            writeln!(out, "{} user records are valid", records.len())?;
        }
        OutputFormat::Text => print_diagnostics(&result),
    }

    Ok(if result.all_valid { EXIT_OK } else { EXIT_ABORTED })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(content: &str) -> (tempfile::TempDir, ValidateArgs) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, content).unwrap();
        (
            dir,
            ValidateArgs {
                users_file: path,
                format: OutputFormat::Text,
            },
        )
    }

    #[test]
    fn valid_file_exits_zero() {
        let (_dir, args) =
            args_for(r#"[{"userid": "alice", "password": "correct-horse-battery"}]"#);
        let mut out = Vec::new();
        assert_eq!(run_validate_to(&args, &mut out).unwrap(), EXIT_OK);
        assert_eq!(String::from_utf8(out).unwrap(), "1 user records are valid\n");
    }

    #[test]
    fn invalid_file_exits_one() {
        let (_dir, args) = args_for(r#"[{"userid": "al", "password": "correct-horse-battery"}]"#);
        assert_eq!(run_validate(&args).unwrap(), EXIT_ABORTED);
    }

    #[test]
    fn empty_file_is_vacuously_valid() {
        let (_dir, args) = args_for("[]");
        assert_eq!(run_validate(&args).unwrap(), EXIT_OK);
    }

    #[test]
    fn json_format_prints_validation_result() {
        let (_dir, mut args) = args_for(r#"[{"userid": "alice"}]"#);
        args.format = OutputFormat::Json;
        let mut out = Vec::new();

        assert_eq!(run_validate_to(&args, &mut out).unwrap(), EXIT_ABORTED);

        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["all_valid"], false);
        assert_eq!(doc["diagnostics"][0]["position"], 1);
        assert_eq!(doc["diagnostics"][0]["userid"], "alice");
        assert_eq!(doc["diagnostics"][0]["rule"], "password");
        assert_eq!(doc["diagnostics"][0]["message"], "missing password");
    }

    #[test]
    fn json_format_reports_valid_batch() {
        let (_dir, mut args) =
            args_for(r#"[{"userid": "alice", "password": "correct-horse-battery"}]"#);
        args.format = OutputFormat::Json;
        let mut out = Vec::new();

        assert_eq!(run_validate_to(&args, &mut out).unwrap(), EXIT_OK);

        let doc: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(doc["all_valid"], true);
        assert_eq!(doc["diagnostics"].as_array().unwrap().len(), 0);
    }
}
