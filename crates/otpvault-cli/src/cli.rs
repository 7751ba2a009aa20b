//! Command-line definition.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "Show and check TOTP codes")]
pub struct Cli {
    /// Settings file (JSON). Missing file means defaults.
    #[arg(long, global = true, env = "OTPVAULT_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the current code for every stored account.
    Codes(CodesArgs),
    /// Run the validation gate on a name and a pasted secret or URI.
    Check {
        /// Account name.
        name: String,
        /// Base32 secret or `otpauth://` URI.
        input: String,
    },
    /// Check a code for a stored account (current step ±1).
    Verify(VerifyArgs),
    /// Show the components of an `otpauth://` URI without its secret.
    ParseUri {
        /// Provisioning URI.
        uri: String,
        /// Emit JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct CodesArgs {
    /// Account file: a JSON object of name to Base32 secret.
    #[arg(long, env = "OTPVAULT_ACCOUNTS", value_name = "PATH")]
    pub accounts: PathBuf,
    /// Compute codes at this Unix time instead of now.
    #[arg(long, value_name = "UNIX_SECONDS")]
    pub at: Option<u64>,
    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct VerifyArgs {
    /// Stored account name.
    pub name: String,
    /// Code to check.
    pub code: String,
    /// Account file: a JSON object of name to Base32 secret.
    #[arg(long, env = "OTPVAULT_ACCOUNTS", value_name = "PATH")]
    pub accounts: PathBuf,
    /// Check against this Unix time instead of now.
    #[arg(long, value_name = "UNIX_SECONDS")]
    pub at: Option<u64>,
}
