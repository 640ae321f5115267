//! # Token Persistence
//!
//! Reads and writes the local Dropbox token file. A missing or unparseable
//! file is never a hard failure: it is logged and treated as "no cached
//! token", leaving re-authorization to the caller.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use hckup_dropbox::StoredToken;
use tracing::{debug, warn};

/// Load the persisted token, absorbing every load problem to `None`
pub fn load_token(path: &Path) -> Option<StoredToken> {
  if !path.exists() {
    debug!("No Dropbox token file at {}", path.display());
    return None;
  }

  let content = match fs::read_to_string(path) {
    Ok(content) => content,
    Err(e) => {
      warn!("Failed to read Dropbox token file {}: {}", path.display(), e);
      return None;
    }
  };

  match serde_json::from_str::<StoredToken>(&content) {
    Ok(token) => Some(token),
    Err(e) => {
      warn!("Failed to parse Dropbox token file {}: {}", path.display(), e);
      None
    }
  }
}

/// Persist the token, tightening permissions to `600` on unix so the file
/// never exposes credentials
pub fn save_token(path: &Path, token: &StoredToken) -> Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
  }

  let content = serde_json::to_string_pretty(token).context("Failed to serialize Dropbox token")?;
  fs::write(path, content).with_context(|| format!("Failed to write Dropbox token file {}", path.display()))?;

  #[cfg(unix)]
  {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)
      .with_context(|| format!("Failed to read metadata of {}", path.display()))?
      .permissions();
    permissions.set_mode(0o600);
    fs::set_permissions(path, permissions)
      .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
  }

  Ok(())
}
