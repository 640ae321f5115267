//! OAuth flows for the Dropbox client.
//!
//! Covers the one-time authorization-code exchange used to obtain the first
//! token and the refresh-token grant used to renew an expired access token.
//! Refresh is an explicit synchronous call returning the new token; the
//! caller decides where to persist it.

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::{Client, StatusCode};
use url::Url;

use crate::consts::{API_BASE_URL, AUTHORIZE_BASE_URL, USER_AGENT};
use crate::models::{StoredToken, TokenResponse};

/// Exchanges OAuth grants for Dropbox access tokens
pub struct DropboxAuthenticator {
  pub(crate) client: Client,
  pub(crate) base_url: String,
  pub(crate) authorize_base_url: String,
  pub(crate) client_id: String,
  pub(crate) client_secret: String,
}

impl DropboxAuthenticator {
  /// Create a new authenticator against the official API
  pub fn new(client_id: &str, client_secret: &str) -> Self {
    Self::with_base_urls(client_id, client_secret, API_BASE_URL, AUTHORIZE_BASE_URL)
  }

  /// Create a new authenticator against explicit base URLs
  pub fn with_base_urls(client_id: &str, client_secret: &str, base_url: &str, authorize_base_url: &str) -> Self {
    let client = Client::new();
    Self {
      client,
      base_url: base_url.to_string(),
      authorize_base_url: authorize_base_url.to_string(),
      client_id: client_id.to_string(),
      client_secret: client_secret.to_string(),
    }
  }

  /// Build the browser URL a user must visit to authorize the app.
  ///
  /// Requests offline access so the resulting token carries a refresh
  /// token.
  pub fn authorize_url(&self) -> Result<String> {
    let url = Url::parse_with_params(
      &self.authorize_base_url,
      &[
        ("client_id", self.client_id.as_str()),
        ("response_type", "code"),
        ("token_access_type", "offline"),
      ],
    )
    .context("Failed to build Dropbox authorization URL")?;

    Ok(url.to_string())
  }

  /// Exchange a one-time authorization code for an access/refresh token
  /// pair
  pub async fn exchange_code(&self, code: &str) -> Result<StoredToken> {
    let response = self
      .client
      .post(format!("{}/oauth2/token", self.base_url))
      .header("User-Agent", USER_AGENT)
      .basic_auth(&self.client_id, Some(&self.client_secret))
      .form(&[("code", code), ("grant_type", "authorization_code")])
      .send()
      .await
      .context("Failed to exchange Dropbox authorization code")?;

    match response.status() {
      StatusCode::OK => {
        let token = response
          .json::<TokenResponse>()
          .await
          .context("Failed to parse Dropbox token response")?;
        Ok(StoredToken::from_response(token, Utc::now()))
      }
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Dropbox rejected the authorization code. Codes are single-use; request a new one."
      )),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Dropbox app credentials."
      )),
      _ => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        response.status(),
        response.text().await.unwrap_or_default()
      )),
    }
  }

  /// Exchange a refresh token for a new access token.
  ///
  /// Dropbox omits the refresh token from refresh responses; the original
  /// one stays valid and is carried over into the returned token.
  pub async fn refresh(&self, refresh_token: &str) -> Result<StoredToken> {
    let response = self
      .client
      .post(format!("{}/oauth2/token", self.base_url))
      .header("User-Agent", USER_AGENT)
      .basic_auth(&self.client_id, Some(&self.client_secret))
      .form(&[("refresh_token", refresh_token), ("grant_type", "refresh_token")])
      .send()
      .await
      .context("Failed to refresh Dropbox access token")?;

    match response.status() {
      StatusCode::OK => {
        let parsed = response
          .json::<TokenResponse>()
          .await
          .context("Failed to parse Dropbox token response")?;
        let mut token = StoredToken::from_response(parsed, Utc::now());
        if token.refresh_token.is_none() {
          token.refresh_token = Some(refresh_token.to_string());
        }
        Ok(token)
      }
      StatusCode::BAD_REQUEST => Err(anyhow::anyhow!(
        "Dropbox rejected the refresh token. It may have been revoked; re-run authorization."
      )),
      StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(anyhow::anyhow!(
        "Authentication failed. Please check your Dropbox app credentials."
      )),
      _ => Err(anyhow::anyhow!(
        "Unexpected error: HTTP {} - {}",
        response.status(),
        response.text().await.unwrap_or_default()
      )),
    }
  }
}

#[cfg(test)]
mod tests {
  use wiremock::matchers::{basic_auth, body_string_contains, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  #[test]
  fn test_authorize_url() {
    let authenticator = DropboxAuthenticator::new("app-key", "app-secret");
    let url = authenticator.authorize_url().unwrap();

    assert!(url.starts_with(AUTHORIZE_BASE_URL));
    assert!(url.contains("client_id=app-key"));
    assert!(url.contains("response_type=code"));
    assert!(url.contains("token_access_type=offline"));
  }

  #[tokio::test]
  async fn test_exchange_code() -> Result<()> {
    let mock_server = MockServer::start().await;
    let authenticator =
      DropboxAuthenticator::with_base_urls("app-key", "app-secret", &mock_server.uri(), AUTHORIZE_BASE_URL);

    Mock::given(method("POST"))
      .and(path("/oauth2/token"))
      .and(basic_auth("app-key", "app-secret"))
      .and(body_string_contains("grant_type=authorization_code"))
      .and(body_string_contains("code=one-time-code"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "access_token": "sl.fresh",
          "token_type": "bearer",
          "expires_in": 14400,
          "refresh_token": "refresh-abc"
      })))
      .mount(&mock_server)
      .await;

    let token = authenticator.exchange_code("one-time-code").await?;
    assert_eq!(token.access_token, "sl.fresh");
    assert_eq!(token.refresh_token, Some("refresh-abc".to_string()));
    assert!(token.expires_at.is_some());

    Ok(())
  }

  #[tokio::test]
  async fn test_exchange_code_rejected() -> Result<()> {
    let mock_server = MockServer::start().await;
    let authenticator =
      DropboxAuthenticator::with_base_urls("app-key", "app-secret", &mock_server.uri(), AUTHORIZE_BASE_URL);

    Mock::given(method("POST"))
      .and(path("/oauth2/token"))
      .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
          "error": "invalid_grant",
          "error_description": "code has already been used"
      })))
      .mount(&mock_server)
      .await;

    let result = authenticator.exchange_code("stale-code").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("single-use"));

    Ok(())
  }

  #[tokio::test]
  async fn test_refresh_preserves_refresh_token() -> Result<()> {
    let mock_server = MockServer::start().await;
    let authenticator =
      DropboxAuthenticator::with_base_urls("app-key", "app-secret", &mock_server.uri(), AUTHORIZE_BASE_URL);

    // Refresh responses carry no refresh_token field
    Mock::given(method("POST"))
      .and(path("/oauth2/token"))
      .and(basic_auth("app-key", "app-secret"))
      .and(body_string_contains("grant_type=refresh_token"))
      .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
          "access_token": "sl.renewed",
          "token_type": "bearer",
          "expires_in": 14400
      })))
      .mount(&mock_server)
      .await;

    let token = authenticator.refresh("refresh-abc").await?;
    assert_eq!(token.access_token, "sl.renewed");
    assert_eq!(token.refresh_token, Some("refresh-abc".to_string()));

    Ok(())
  }

  #[tokio::test]
  async fn test_refresh_revoked() -> Result<()> {
    let mock_server = MockServer::start().await;
    let authenticator =
      DropboxAuthenticator::with_base_urls("app-key", "app-secret", &mock_server.uri(), AUTHORIZE_BASE_URL);

    Mock::given(method("POST"))
      .and(path("/oauth2/token"))
      .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
          "error": "invalid_grant"
      })))
      .mount(&mock_server)
      .await;

    let result = authenticator.refresh("revoked").await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("re-run authorization"));

    Ok(())
  }
}
