//! # Render Subcommand
//!
//! Prints the text outline of a form built from a schema, optional
//! presentation hints and optional data.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use formkit_form::{FormSession, OutlineRenderer, UiSchema};
use formkit_schema::Locale;

/// Arguments for the `formkit render` subcommand.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Schema file (JSON or YAML).
    #[arg(long)]
    pub schema: PathBuf,

    /// Presentation hints file (JSON or YAML).
    #[arg(long)]
    pub ui_schema: Option<PathBuf>,

    /// Initial form data file (JSON or YAML).
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Message locale (it, en). Overrides the config file.
    #[arg(long)]
    pub locale: Option<Locale>,

    /// Session configuration file (JSON or YAML).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Validate before rendering so errors appear in the outline.
    #[arg(long)]
    pub validate: bool,
}

/// Build the session and render its outline.
pub fn outline(args: &RenderArgs) -> Result<String> {
    let schema = crate::load_schema(&args.schema)?;
    let ui = UiSchema::from_value(&crate::load_optional(
        args.ui_schema.as_deref(),
        "presentation hints",
    )?);
    let data = crate::load_optional(args.data.as_deref(), "data")?;
    let config = crate::load_config(args.config.as_deref(), args.locale)?;

    let mut session: FormSession<String> = FormSession::builder(schema)
        .ui_schema(ui)
        .form_data(data)
        .config(config)
        .build()
        .context("failed to build form session")?;

    if args.validate {
        session.validate()?;
    }
    Ok(session.render(&mut OutlineRenderer::new())?)
}

/// Execute the render subcommand.
pub fn run_render(args: &RenderArgs) -> Result<u8> {
    println!("{}", outline(args)?);
    Ok(0)
}
