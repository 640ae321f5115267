//! Constants for the hckup-dropbox client.

/// Base URL for Dropbox RPC-style endpoints (files, sharing, oauth2)
pub const API_BASE_URL: &str = "https://api.dropboxapi.com";

/// Base URL for Dropbox content-upload endpoints
pub const CONTENT_BASE_URL: &str = "https://content.dropboxapi.com";

/// Base URL for the browser-facing OAuth authorization page
pub const AUTHORIZE_BASE_URL: &str = "https://www.dropbox.com/oauth2/authorize";

/// User-Agent header value for the Dropbox API client
pub const USER_AGENT: &str = concat!("hckup/", env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
