use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::instrument;

use crate::client::DropboxClient;
use crate::consts::USER_AGENT;
use crate::models::{PathArg, SharedLinkMetadata};

impl DropboxClient {
  /// Create a public shared link for a remote path and return its URL
  #[instrument(skip(self), level = "debug")]
  pub async fn create_shared_link(&self, path: &str) -> Result<String> {
    let url = format!("{}/2/sharing/create_shared_link_with_settings", self.base_url);

    let payload = PathArg { path: path.to_string() };

    let response = self
      .client
      .post(&url)
      .header("User-Agent", USER_AGENT)
      .bearer_auth(&self.access_token)
      .json(&payload)
      .send()
      .await
      .context("Failed to create Dropbox shared link")?;

    match response.status() {
      StatusCode::OK => {
        let link = response
          .json::<SharedLinkMetadata>()
          .await
          .context("Failed to parse shared link response")?;
        Ok(link.url)
      }
      StatusCode::CONFLICT => Err(anyhow::anyhow!("A shared link for {} already exists", path)),
      StatusCode::NOT_FOUND => Err(anyhow::anyhow!("Dropbox path {} not found", path)),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Dropbox access token."
      )),
      _ => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        response.status(),
        response.text().await.unwrap_or_default()
      )),
    }
  }
}
