use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use hckup_dropbox::{DropboxAuthenticator, DropboxClient};
use tokio::runtime::Runtime;
use tracing::info;

use crate::config::Config;
use crate::output::{print_info, print_success, print_warning};
use crate::token_store;

/// Handle the authorize command: the one-time interactive OAuth flow
pub fn handle_authorize(config: &Config) -> Result<()> {
  let (client_id, client_secret) = match (&config.dropbox.client_id, &config.dropbox.client_secret) {
    (Some(id), Some(secret)) => (id, secret),
    _ => anyhow::bail!(
      "Dropbox app credentials are not configured. Set dropbox_client_id and dropbox_client_secret."
    ),
  };

  let token_file = config.dropbox.token_file.as_deref().ok_or_else(|| {
    anyhow::anyhow!("No token file configured. Set dropbox_token_json to the path the token should be saved to.")
  })?;

  let authenticator = DropboxAuthenticator::new(client_id, client_secret);

  print_info("Navigate to the following URL and approve access:");
  println!("  {}", authenticator.authorize_url()?);
  print!("Enter the authorization code: ");
  io::stdout().flush().context("Failed to flush stdout")?;

  let mut code = String::new();
  io::stdin()
    .lock()
    .read_line(&mut code)
    .context("Failed to read authorization code")?;
  let code = code.trim();
  if code.is_empty() {
    anyhow::bail!("No authorization code entered");
  }

  let rt = Runtime::new().context("Failed to create async runtime")?;
  let token = rt.block_on(authenticator.exchange_code(code))?;
  token_store::save_token(token_file, &token)?;

  info!("Dropbox token saved");
  print_success(&format!("Dropbox token saved to {}", token_file.display()));

  // Best-effort confirmation; the token is already persisted either way
  let client = DropboxClient::new(&token.access_token);
  match rt.block_on(client.get_current_account()) {
    Ok(account) => print_info(&format!("Authorized as {}", account.name.display_name)),
    Err(e) => print_warning(&format!("Could not verify the new token: {e}")),
  }

  Ok(())
}
