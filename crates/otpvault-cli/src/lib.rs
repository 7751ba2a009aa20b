//! `otpvault`: command-line front end for `otpvault-core`.
//!
//! Reads a plain JSON account file to print current codes or check a code,
//! runs pasted secrets through the validation gate, and inspects
//! provisioning URIs.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod accounts;
pub mod cli;
pub mod commands;
pub mod logging;
pub mod settings;

use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;

use crate::accounts::Accounts;
use crate::cli::{Cli, Command};
use crate::settings::Settings;

/// Settings file used when neither `--config` nor `OTPVAULT_CONFIG` is given.
pub const DEFAULT_SETTINGS_FILE: &str = "otpvault.json";

/// Parse arguments, set up logging and run the selected command.
///
/// # Errors
///
/// Returns an error if the account file cannot be loaded, a URI is
/// invalid, or the configured parameters are unusable.
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let settings_path = cli
        .config
        .clone()
        .unwrap_or_else(|| Path::new(DEFAULT_SETTINGS_FILE).to_path_buf());

    let (settings, settings_error) = match Settings::load(&settings_path) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    logging::init(&settings.log_filter);
    if let Some(e) = settings_error {
        tracing::warn!(error = %e, "using default settings");
    }
    settings
        .otp
        .validate()
        .context("unusable OTP parameters in settings")?;

    match cli.command {
        Command::Codes(args) => {
            let accounts = Accounts::load(&args.accounts)?;
            let now = instant(args.at)?;
            let lines = commands::codes(&accounts, &settings.otp, now);
            if args.json {
                println!("{}", serde_json::to_string_pretty(&lines)?);
            } else {
                for line in &lines {
                    println!("{}", line.to_line());
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { name, input } => {
            let result = commands::check(&name, &input);
            println!("{}", result.to_line());
            Ok(if result.ok {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Verify(args) => {
            let accounts = Accounts::load(&args.accounts)?;
            let result = commands::verify(
                &accounts,
                &args.name,
                &args.code,
                &settings.otp,
                instant(args.at)?,
            )?;
            println!("{}", result.to_line());
            Ok(if result.valid {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::ParseUri { uri, json } => {
            let summary = commands::parse_uri(&uri)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                for line in summary.to_lines() {
                    println!("{line}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `--at` as an instant, or the current time.
fn instant(at: Option<u64>) -> anyhow::Result<SystemTime> {
    match at {
        Some(secs) => UNIX_EPOCH
            .checked_add(Duration::from_secs(secs))
            .context("--at is out of range"),
        None => Ok(SystemTime::now()),
    }
}
