//! # Validate Subcommand
//!
//! Builds a session over a data file, submits it, and reports the
//! localized errors grouped by field. Exit code 0 when the data is valid,
//! 1 when it is not.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use serde_json::Value;

use formkit_core::SubmitRejected;
use formkit_form::{FormSession, SubmitOutcome};
use formkit_schema::{Locale, LocalizedError};

/// Arguments for the `formkit validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Form data file (JSON or YAML).
    #[arg(long)]
    pub data: PathBuf,

    /// Message locale (it, en). Overrides the config file.
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Session configuration file (JSON or YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print errors as a JSON array instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Submit the data file and return the outcome.
pub fn check(args: &ValidateArgs) -> Result<SubmitOutcome> {
    let schema = crate::load_schema(&args.schema)?;
    let data = crate::load_optional(Some(&args.data), "data")?;
    let config = crate::load_config(args.config.as_deref(), args.locale)?;

    let mut session: FormSession<String> = FormSession::builder(schema)
        .form_data(data)
        .config(config)
        .build()
        .context("failed to build form session")?;

    let mut accept = |_: &Value| -> Result<(), SubmitRejected> { Ok(()) };
    let outcome = session.submit(&mut accept)?;
    tracing::info!(
        data = %args.data.display(),
        state = %session.state(),
        "validation finished"
    );
    Ok(outcome)
}

/// Group errors by field path, keeping first-seen order.
pub fn group_by_path(errors: &[LocalizedError]) -> Vec<(&str, Vec<&str>)> {
    let mut groups: Vec<(&str, Vec<&str>)> = Vec::new();
    for error in errors {
        match groups.iter_mut().find(|(path, _)| *path == error.path) {
            Some((_, messages)) => messages.push(error.message.as_str()),
            None => groups.push((error.path.as_str(), vec![error.message.as_str()])),
        }
    }
    groups
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when valid, 1 when invalid.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let errors = match check(args)? {
        SubmitOutcome::Submitted(_) => Vec::new(),
        SubmitOutcome::Invalid { errors } => errors,
        SubmitOutcome::Rejected(rejection) => bail!("unexpected rejection: {rejection}"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&errors)?);
    } else if errors.is_empty() {
        println!("OK: {} is valid", args.data.display());
    } else {
        println!("FAIL: {} ({} error(s))", args.data.display(), errors.len());
        for (path, messages) in group_by_path(&errors) {
            let path = if path.is_empty() { "(root)" } else { path };
            println!("  {path}");
            for message in messages {
                println!("    - {message}");
            }
        }
    }

    Ok(u8::from(!errors.is_empty()))
}
