use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An OAuth token as persisted to the local token file.
///
/// `expires_at` is unix seconds; `None` means a long-lived token that never
/// expires (legacy raw tokens).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
  pub access_token: String,
  pub refresh_token: Option<String>,
  pub expires_at: Option<i64>,
}

impl StoredToken {
  /// Wrap a raw long-lived access token
  pub fn from_raw(access_token: &str) -> Self {
    Self {
      access_token: access_token.to_string(),
      refresh_token: None,
      expires_at: None,
    }
  }

  /// Build a stored token from an oauth2/token response received at
  /// `obtained_at`
  pub fn from_response(response: TokenResponse, obtained_at: DateTime<Utc>) -> Self {
    Self {
      access_token: response.access_token,
      refresh_token: response.refresh_token,
      expires_at: response.expires_in.map(|secs| obtained_at.timestamp() + secs),
    }
  }

  /// Whether the access token has expired as of `now`
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.expires_at.is_some_and(|at| at <= now.timestamp())
  }
}

/// Response body of the Dropbox `oauth2/token` endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
  pub access_token: String,
  pub expires_in: Option<i64>,
  pub refresh_token: Option<String>,
}

/// Request payload carrying a single remote path (create_folder_v2,
/// create_shared_link_with_settings)
#[derive(Debug, Serialize)]
pub struct PathArg {
  pub path: String,
}

/// Argument object serialized into the `Dropbox-API-Arg` header of a
/// content upload
#[derive(Debug, Serialize)]
pub struct UploadArg {
  pub path: String,
  pub mode: String,
  pub autorename: bool,
  pub mute: bool,
}

impl UploadArg {
  pub fn add(path: &str) -> Self {
    Self {
      path: path.to_string(),
      mode: "add".to_string(),
      autorename: false,
      mute: false,
    }
  }
}

/// Folder metadata returned by create_folder_v2
#[derive(Debug, Deserialize)]
pub struct FolderMetadata {
  pub name: String,
  pub path_lower: Option<String>,
}

/// Response body of create_folder_v2
#[derive(Debug, Deserialize)]
pub struct CreateFolderResult {
  pub metadata: FolderMetadata,
}

/// Shared link metadata returned by create_shared_link_with_settings
#[derive(Debug, Deserialize)]
pub struct SharedLinkMetadata {
  pub url: String,
  pub name: Option<String>,
}

/// Account information returned by users/get_current_account
#[derive(Debug, Deserialize)]
pub struct Account {
  pub name: AccountName,
  pub email: Option<String>,
}

/// Name block of a Dropbox account
#[derive(Debug, Deserialize)]
pub struct AccountName {
  pub display_name: String,
}
