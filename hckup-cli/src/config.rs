//! # Configuration
//!
//! Loads the immutable run configuration from a JSON file in the working
//! directory or, when the file is absent, from `AUTOHCK_*` environment
//! variables. The file takes precedence. The resulting value is constructed
//! once at process entry and passed into the workflow explicitly.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::consts::{
  ENV_DROPBOX_CLIENT_ID, ENV_DROPBOX_CLIENT_SECRET, ENV_DROPBOX_TOKEN, ENV_DROPBOX_TOKEN_JSON, ENV_GITHUB_LOGIN,
  ENV_GITHUB_TOKEN,
};

/// GitHub credentials for the pull-request and status API
#[derive(Debug, Clone)]
pub struct GitHubCredentials {
  pub login: String,
  pub token: String,
}

/// Dropbox-side settings: a raw long-lived token, a token-file path, app
/// credentials, or a combination of the latter two
#[derive(Debug, Clone, Default)]
pub struct DropboxSettings {
  pub access_token: Option<String>,
  pub token_file: Option<PathBuf>,
  pub client_id: Option<String>,
  pub client_secret: Option<String>,
}

/// Immutable configuration for one process run
#[derive(Debug, Clone)]
pub struct Config {
  pub github: Option<GitHubCredentials>,
  pub dropbox: DropboxSettings,
}

/// On-disk shape of config.json
#[derive(Deserialize)]
struct ConfigFile {
  github_credentials: Option<GitHubCredentialsFile>,
  dropbox_token: Option<String>,
  dropbox_token_json: Option<PathBuf>,
  dropbox_client_id: Option<String>,
  dropbox_client_secret: Option<String>,
}

#[derive(Deserialize)]
struct GitHubCredentialsFile {
  login: String,
  password: String,
}

impl Config {
  /// Load configuration, preferring the file when it exists
  pub fn load(path: &Path) -> Result<Self> {
    if path.exists() {
      debug!("Loading configuration from {}", path.display());
      Self::from_file(path)
    } else {
      debug!("No configuration file at {}, reading environment", path.display());
      Ok(Self::from_env())
    }
  }

  fn from_file(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read configuration file {}", path.display()))?;

    let file: ConfigFile =
      serde_json::from_str(&content).with_context(|| format!("Failed to parse configuration file {}", path.display()))?;

    Ok(Self {
      github: file.github_credentials.map(|creds| GitHubCredentials {
        login: creds.login,
        token: creds.password,
      }),
      dropbox: DropboxSettings {
        access_token: file.dropbox_token,
        token_file: file.dropbox_token_json,
        client_id: file.dropbox_client_id,
        client_secret: file.dropbox_client_secret,
      },
    })
  }

  fn from_env() -> Self {
    let github = match (env::var(ENV_GITHUB_LOGIN).ok(), env::var(ENV_GITHUB_TOKEN).ok()) {
      (Some(login), Some(token)) => Some(GitHubCredentials { login, token }),
      _ => None,
    };

    Self {
      github,
      dropbox: DropboxSettings {
        access_token: env::var(ENV_DROPBOX_TOKEN).ok(),
        token_file: env::var(ENV_DROPBOX_TOKEN_JSON).ok().map(PathBuf::from),
        client_id: env::var(ENV_DROPBOX_CLIENT_ID).ok(),
        client_secret: env::var(ENV_DROPBOX_CLIENT_SECRET).ok(),
      },
    }
  }
}
