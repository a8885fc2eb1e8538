//! # diet-screen CLI
//!
//! Command-line front end for `diet_core`: maps flags (or a JSON form file)
//! onto a screening session, prints the report and optionally exports the
//! PDF. The session is reset after a successful export.

mod cli;
mod render;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use diet_core::{ScreeningForm, ScreeningSession};

use crate::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_options {
        print!("{}", render::OptionsText);
        return Ok(());
    }

    let form = match &cli.form {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read form file {}", path.display()))?;
            ScreeningForm::from_json(&json).with_context(|| format!("Invalid form file {}", path.display()))?
        }
        None => cli.to_form(),
    };

    let mut session = ScreeningSession::with_form(form);
    let report = session.calculate().context("Screening could not be calculated")?;

    if cli.json {
        let mut output = serde_json::Map::new();
        output.insert("summary".to_string(), serde_json::to_value(report.summary())?);
        output.insert("report".to_string(), serde_json::to_value(report)?);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render::ReportText(report));
    }

    if cli.pdf {
        let settings = cli.export_settings().context("Failed to load export settings")?;
        let path = session
            .export_then_reset(&settings)
            .context("Failed to export PDF report")?;
        info!(path = %path.display(), "session reset after export");
        eprintln!("PDF written to {}", path.display());
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
