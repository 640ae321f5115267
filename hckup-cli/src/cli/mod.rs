//! # Command Line Interface
//!
//! Defines the CLI structure and command handlers for the hckup tool: the
//! artifact upload workflow and the one-time Dropbox authorization flow.

mod authorize;
mod upload;

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};

pub use upload::UploadArgs;

use crate::config::Config;
use crate::consts::CONFIG_FILE;

/// Top-level CLI command for the hckup tool
#[derive(Parser)]
#[command(name = "hckup")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(about = "Uploads pull-request build artifacts to Dropbox and links them on the commit status")]
#[command(
  long_about = "hckup takes a pull request's head commit, uploads a directory of build\n\
        artifacts to Dropbox, creates a public share link for the folder, and posts\n\
        that link back onto the commit's status check on GitHub."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightGreen.on_default().bold().underline())
    .usage(AnsiColor::Green.on_default().bold())
    .literal(AnsiColor::BrightGreen.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Path of the JSON configuration file
  #[arg(long, global = true, default_value = CONFIG_FILE)]
  pub config: PathBuf,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for the hckup tool
#[derive(Subcommand)]
pub enum Commands {
  /// Upload a directory of build artifacts for a pull request
  #[command(long_about = "Upload a directory of build artifacts for a pull request.\n\n\
            Resolves the open pull request whose head matches the given commit,\n\
            creates a timestamped Dropbox folder for the run, uploads every regular\n\
            file in the directory, and posts the folder's share link as the target\n\
            URL of the commit's status check.")]
  #[command(alias = "up")]
  Upload(upload::UploadArgs),

  /// Run the one-time interactive Dropbox authorization flow
  #[command(long_about = "Run the one-time interactive Dropbox authorization flow.\n\n\
            Prints an authorization URL, reads the authorization code from standard\n\
            input, exchanges it for an access/refresh token pair, and persists the\n\
            pair to the configured token file. Requires the Dropbox app client id\n\
            and secret in the configuration.")]
  #[command(alias = "auth")]
  Authorize,
}

/// Handle the CLI commands
pub fn handle_cli(cli: Cli) -> Result<()> {
  let config = Config::load(&cli.config)?;

  match cli.command {
    Commands::Upload(args) => upload::handle_upload(&config, args),
    Commands::Authorize => authorize::handle_authorize(&config),
  }
}
