//! # Upload Workflow
//!
//! The six-stage workflow driving a single run: authenticate against both
//! services, resolve the pull request for the commit, create the share
//! folder, look up the prior status, publish the status carrying the share
//! URL, and upload the artifact files. Stages run strictly in order; every
//! unrecoverable failure aborts the run, nothing is retried, and remote
//! state created before a failure is left in place.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use hckup_dropbox::{DropboxAuthenticator, DropboxClient, StoredToken};
use hckup_gh::{CommitStatus, CreateStatusRequest, GitHubAuth, GitHubClient, GitHubPullRequest, StatusState};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::token_store;

/// Options for a single upload run, resolved from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
  pub repo: String,
  pub commit: String,
  pub path: PathBuf,
  pub context: String,
  pub description: Option<String>,
  pub state: Option<StatusState>,
  pub create: bool,
}

/// A created remote folder together with its public share link
#[derive(Debug, Clone)]
pub struct RemoteFolder {
  pub path: String,
  pub url: String,
}

/// Drives the upload workflow and holds the per-run session state
pub struct Uploader {
  options: RunOptions,
  config: Config,
  owner: String,
  repo_name: String,
  authenticator: Option<DropboxAuthenticator>,
  github: Option<GitHubClient>,
  dropbox: Option<DropboxClient>,
  pr: Option<GitHubPullRequest>,
  folder: Option<RemoteFolder>,
  prior_status: Option<CommitStatus>,
}

impl Uploader {
  /// Create an uploader from the run configuration and options
  pub fn new(config: &Config, options: RunOptions) -> Result<Self> {
    let (owner, repo_name) = split_repo(&options.repo)?;

    let authenticator = match (&config.dropbox.client_id, &config.dropbox.client_secret) {
      (Some(id), Some(secret)) => Some(DropboxAuthenticator::new(id, secret)),
      _ => None,
    };

    Ok(Self {
      options,
      config: config.clone(),
      owner,
      repo_name,
      authenticator,
      github: None,
      dropbox: None,
      pr: None,
      folder: None,
      prior_status: None,
    })
  }

  /// Drive the full workflow and return the share URL
  pub async fn run(&mut self) -> Result<String> {
    self.authenticate().await?;
    self.locate_pull_request().await?;
    self.create_share_folder().await?;
    self.fetch_prior_status().await?;
    self.publish_status().await?;
    self.upload_directory().await?;

    let folder = self.folder.as_ref().ok_or_else(|| anyhow::anyhow!("No remote folder created"))?;
    Ok(folder.url.clone())
  }

  /// Establish sessions with both services.
  ///
  /// The GitHub handle is stateless and keyed by login + token. The Dropbox
  /// session needs a usable access token: a raw configured token, or the
  /// persisted token file, refreshed and re-persisted when expired. A run
  /// without a usable storage credential aborts here.
  pub async fn authenticate(&mut self) -> Result<()> {
    if self.github.is_none() {
      let creds = self
        .config
        .github
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("GitHub credentials are not configured"))?;

      info!("Connecting to GitHub as {}", creds.login);
      self.github = Some(GitHubClient::new(GitHubAuth {
        username: creds.login.clone(),
        token: creds.token.clone(),
      }));
    }

    if self.dropbox.is_none() {
      let token = self.establish_dropbox_token().await?;
      self.dropbox = Some(DropboxClient::new(&token.access_token));
    }

    Ok(())
  }

  /// Resolve a usable Dropbox access token
  async fn establish_dropbox_token(&self) -> Result<StoredToken> {
    if let Some(raw) = &self.config.dropbox.access_token {
      debug!("Using configured Dropbox access token");
      return Ok(StoredToken::from_raw(raw));
    }

    let token_file = self
      .config
      .dropbox
      .token_file
      .as_deref()
      .ok_or_else(|| anyhow::anyhow!("No Dropbox token configured. Run `hckup authorize` first."))?;

    info!("Loading Dropbox token from {}", token_file.display());
    let mut token = token_store::load_token(token_file).ok_or_else(|| {
      anyhow::anyhow!(
        "Dropbox authentication failure: no usable token in {}. Run `hckup authorize` first.",
        token_file.display()
      )
    })?;

    if token.is_expired(Utc::now()) {
      match (token.refresh_token.clone(), &self.authenticator) {
        (Some(refresh_token), Some(authenticator)) => {
          info!("Dropbox access token expired, refreshing");
          token = authenticator
            .refresh(&refresh_token)
            .await
            .context("Failed to refresh Dropbox access token")?;
          token_store::save_token(token_file, &token)?;
        }
        _ => warn!("Dropbox access token expired and cannot be refreshed without app credentials"),
      }
    }

    Ok(token)
  }

  /// Resolve the pull request whose head commit matches the configured SHA.
  ///
  /// Linear scan over the repository's open pull requests; the first match
  /// wins. Every later stage depends on the PR number, so a miss aborts the
  /// run.
  pub async fn locate_pull_request(&mut self) -> Result<()> {
    let github = self
      .github
      .as_ref()
      .ok_or_else(|| anyhow::anyhow!("GitHub session not established"))?;

    info!("Retrieving pull request for commit {}", self.options.commit);
    let pulls = github.get_pull_requests(&self.owner, &self.repo_name, Some("open")).await?;

    let pr = pulls
      .into_iter()
      .find(|pr| pr.head.sha == self.options.commit)
      .ok_or_else(|| {
        anyhow::anyhow!(
          "No open pull request with head commit {} in {}",
          self.options.commit,
          self.options.repo
        )
      })?;

    info!("Commit {} belongs to pull request #{}", self.options.commit, pr.number);
    self.pr = Some(pr);
    Ok(())
  }

  /// Create the timestamped remote folder and obtain its share link.
  ///
  /// The path prefix is deterministic in repository and PR number; the
  /// seconds-granularity timestamp suffix makes each invocation a fresh
  /// folder instead of appending to a previous run's.
  pub async fn create_share_folder(&mut self) -> Result<()> {
    let dropbox = self
      .dropbox
      .as_ref()
      .ok_or_else(|| anyhow::anyhow!("Dropbox session not established"))?;
    let pr = self.pr.as_ref().ok_or_else(|| anyhow::anyhow!("No pull request resolved"))?;

    let timestamp = Local::now().format("%Y_%m_%d_%H_%M_%S").to_string();
    let path = remote_folder_path(&self.options.repo, pr.number, &timestamp);

    info!("Creating remote folder {}", path);
    dropbox.create_folder(&path).await?;

    let url = dropbox.create_shared_link(&path).await?;
    // &lst= lands the link on the folder list view
    let url = format!("{url}&lst=");

    self.folder = Some(RemoteFolder { path, url });
    Ok(())
  }

  /// Find the most recent status entry matching the configured context
  pub async fn fetch_prior_status(&mut self) -> Result<()> {
    let github = self
      .github
      .as_ref()
      .ok_or_else(|| anyhow::anyhow!("GitHub session not established"))?;

    info!("Retrieving current status for commit {}", self.options.commit);
    let combined = github
      .get_combined_status(&self.owner, &self.repo_name, &self.options.commit)
      .await?;

    self.prior_status = combined
      .statuses
      .into_iter()
      .find(|status| status.context == self.options.context);

    if self.prior_status.is_none() {
      debug!("No '{}' status on commit {}", self.options.context, self.options.commit);
    }

    Ok(())
  }

  /// Post the status carrying the share URL back onto the commit.
  ///
  /// In create mode the context/description/state triple comes from the
  /// command line; otherwise it is cloned from the located prior status,
  /// whose absence aborts the run. The target URL is always overwritten
  /// with the share link.
  pub async fn publish_status(&mut self) -> Result<()> {
    let github = self
      .github
      .as_ref()
      .ok_or_else(|| anyhow::anyhow!("GitHub session not established"))?;
    let folder = self.folder.as_ref().ok_or_else(|| anyhow::anyhow!("No remote folder created"))?;

    let request = if self.options.create {
      let state = self
        .options
        .state
        .ok_or_else(|| anyhow::anyhow!("Creating a status requires a state"))?;

      CreateStatusRequest {
        state,
        target_url: Some(folder.url.clone()),
        description: self.options.description.clone(),
        context: self.options.context.clone(),
      }
    } else {
      let prior = self.prior_status.as_ref().ok_or_else(|| {
        anyhow::anyhow!(
          "No existing '{}' status on commit {} to update",
          self.options.context,
          self.options.commit
        )
      })?;

      CreateStatusRequest {
        state: prior.state,
        target_url: Some(folder.url.clone()),
        description: prior.description.clone(),
        context: prior.context.clone(),
      }
    };

    info!("Updating '{}' status with the share link", request.context);
    github
      .create_commit_status(&self.owner, &self.repo_name, &self.options.commit, &request)
      .await?;

    Ok(())
  }

  /// Upload every regular file in the local directory to the remote folder.
  ///
  /// Direct entries only; subdirectories and other non-files are skipped.
  /// One blocking call per file, in directory-listing order.
  pub async fn upload_directory(&self) -> Result<()> {
    let dropbox = self
      .dropbox
      .as_ref()
      .ok_or_else(|| anyhow::anyhow!("Dropbox session not established"))?;
    let folder = self.folder.as_ref().ok_or_else(|| anyhow::anyhow!("No remote folder created"))?;

    info!("Uploading files from {}", self.options.path.display());
    let entries = fs::read_dir(&self.options.path)
      .with_context(|| format!("Failed to read local directory {}", self.options.path.display()))?;

    for entry in entries {
      let entry = entry.context("Failed to read directory entry")?;
      let file_type = entry.file_type().context("Failed to inspect directory entry")?;
      if !file_type.is_file() {
        debug!("Skipping {} (not a regular file)", entry.path().display());
        continue;
      }

      let file_name = entry.file_name();
      let file_name = file_name.to_string_lossy();
      let contents = fs::read(entry.path()).with_context(|| format!("Failed to read {}", entry.path().display()))?;

      let remote_path = format!("{}/{}", folder.path, file_name);
      debug!("Uploading {} ({} bytes)", remote_path, contents.len());
      dropbox.upload(&remote_path, contents).await?;
    }

    Ok(())
  }
}

/// Split an `owner/name` repository identifier
fn split_repo(repo: &str) -> Result<(String, String)> {
  repo
    .split_once('/')
    .filter(|(owner, name)| !owner.is_empty() && !name.is_empty())
    .map(|(owner, name)| (owner.to_string(), name.to_string()))
    .ok_or_else(|| anyhow::anyhow!("Invalid repository '{repo}'. Expected owner/name"))
}

/// Build the remote folder path for a pull request: deterministic prefix,
/// per-invocation timestamp suffix
fn remote_folder_path(repo: &str, pr_number: u32, timestamp: &str) -> String {
  format!("/{repo}/Build/PR {pr_number} - {timestamp}")
}
