//! # Dropbox HTTP Client
//!
//! HTTP client implementation for Dropbox API interactions. Dropbox splits
//! its surface across two hosts: RPC-style endpoints (folders, sharing) on
//! the api host and content uploads on the content host, so the client
//! carries a base URL for each.

use anyhow::{Context, Result};
use reqwest::Client;

use crate::consts::{API_BASE_URL, CONTENT_BASE_URL, USER_AGENT};
use crate::models::Account;

/// Represents a Dropbox API client
pub struct DropboxClient {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) content_url: String,
  pub(crate) access_token: String,
}

impl DropboxClient {
  /// Create a new Dropbox client against the official API hosts
  pub fn new(access_token: &str) -> Self {
    Self::with_base_urls(access_token, API_BASE_URL, CONTENT_BASE_URL)
  }

  /// Create a new Dropbox client against explicit base URLs
  pub fn with_base_urls(access_token: &str, base_url: &str, content_url: &str) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: base_url.to_string(),
      content_url: content_url.to_string(),
      access_token: access_token.to_string(),
    }
  }

  /// Test the Dropbox connection by fetching the current account
  pub async fn get_current_account(&self) -> Result<Account> {
    let url = format!("{}/2/users/get_current_account", self.base_url);

    let response = self
      .client
      .post(&url)
      .header("User-Agent", USER_AGENT)
      .bearer_auth(&self.access_token)
      .send()
      .await
      .context("Failed to connect to Dropbox")?;

    if !response.status().is_success() {
      return Err(anyhow::anyhow!(
        "Dropbox rejected the access token: HTTP {}",
        response.status()
      ));
    }

    response.json::<Account>().await.context("Failed to parse Dropbox account")
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  #[test]
  fn test_dropbox_client_creation() {
    let client = DropboxClient::new("sl.test");

    assert_eq!(client.base_url, API_BASE_URL);
    assert_eq!(client.content_url, CONTENT_BASE_URL);
    assert_eq!(client.access_token, "sl.test");
  }

  #[tokio::test]
  async fn test_get_current_account() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = DropboxClient::with_base_urls("sl.test", &mock_server.uri(), &mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/2/users/get_current_account"))
      .and(header("Authorization", "Bearer sl.test"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "name": {
              "display_name": "HCK CI"
          },
          "email": "ci@example.com"
      })))
      .mount(&mock_server)
      .await;

    let account = client.get_current_account().await?;
    assert_eq!(account.name.display_name, "HCK CI");

    Ok(())
  }

  #[tokio::test]
  async fn test_get_current_account_rejected_token() -> Result<()> {
    let mock_server = MockServer::start().await;
    let client = DropboxClient::with_base_urls("sl.bad", &mock_server.uri(), &mock_server.uri());

    Mock::given(method("POST"))
      .and(path("/2/users/get_current_account"))
      .respond_with(ResponseTemplate::new(401))
      .mount(&mock_server)
      .await;

    let result = client.get_current_account().await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("rejected the access token"));

    Ok(())
  }
}
