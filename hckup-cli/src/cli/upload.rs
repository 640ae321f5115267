use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use hckup_gh::StatusState;
use tokio::runtime::Runtime;

use crate::config::Config;
use crate::consts::DEFAULT_STATUS_CONTEXT;
use crate::output::{format_share_url, print_success};
use crate::uploader::{RunOptions, Uploader};

/// Arguments for the upload command
#[derive(Args)]
pub struct UploadArgs {
  /// Repository in owner/name form (e.g. "HCK-CI/AutoHCK")
  pub repo: String,

  /// Head commit SHA of the pull request
  pub commit: String,

  /// Local directory containing the build artifacts
  pub path: PathBuf,

  /// Status context to update
  #[arg(default_value = DEFAULT_STATUS_CONTEXT)]
  pub context: String,

  /// Status description, used in --create mode
  pub description: Option<String>,

  /// Status state, used in --create mode
  #[arg(value_parser = parse_status_state)]
  pub state: Option<StatusState>,

  /// Create a fresh status instead of updating the latest matching one
  #[arg(long)]
  pub create: bool,
}

fn parse_status_state(value: &str) -> Result<StatusState, String> {
  value.parse::<StatusState>().map_err(|e| e.to_string())
}

/// Handle the upload command
pub fn handle_upload(config: &Config, args: UploadArgs) -> Result<()> {
  if args.create && args.state.is_none() {
    anyhow::bail!("--create requires a status state (pending, success, failure or error)");
  }

  let options = RunOptions {
    repo: args.repo,
    commit: args.commit,
    path: args.path,
    context: args.context,
    description: args.description,
    state: args.state,
    create: args.create,
  };

  let rt = Runtime::new().context("Failed to create async runtime")?;
  let mut uploader = Uploader::new(config, options)?;
  let share_url = rt.block_on(uploader.run())?;

  print_success("Artifacts uploaded");
  println!("  Share link: {}", format_share_url(&share_url));

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_status_state() {
    assert_eq!(parse_status_state("pending").unwrap(), StatusState::Pending);
    assert_eq!(parse_status_state("error").unwrap(), StatusState::Error);

    let error = parse_status_state("green").unwrap_err();
    assert!(error.contains("Invalid status state"));
  }

  #[test]
  fn test_create_mode_requires_state() {
    let config = Config {
      github: None,
      dropbox: crate::config::DropboxSettings::default(),
    };

    let args = UploadArgs {
      repo: "org/repo".to_string(),
      commit: "abc123".to_string(),
      path: PathBuf::from("artifacts"),
      context: DEFAULT_STATUS_CONTEXT.to_string(),
      description: None,
      state: None,
      create: true,
    };

    let result = handle_upload(&config, args);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("requires a status state"));
  }
}
