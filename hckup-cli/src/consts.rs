//! Constants for the hckup CLI
//!
//! This module defines environment variable names, default values, and
//! other static strings used throughout the hckup CLI.

/// Default configuration file read from the working directory
pub const CONFIG_FILE: &str = "config.json";

/// Default status context updated when none is given on the command line
pub const DEFAULT_STATUS_CONTEXT: &str = "HCK-CI";

/// Environment variable for the GitHub login
pub const ENV_GITHUB_LOGIN: &str = "AUTOHCK_GITHUB_LOGIN";

/// Environment variable for the GitHub token
pub const ENV_GITHUB_TOKEN: &str = "AUTOHCK_GITHUB_TOKEN";

/// Environment variable for a raw long-lived Dropbox access token
pub const ENV_DROPBOX_TOKEN: &str = "AUTOHCK_DROPBOX_TOKEN";

/// Environment variable for the path of the persisted Dropbox token file
pub const ENV_DROPBOX_TOKEN_JSON: &str = "AUTOHCK_DROPBOX_TOKEN_JSON";

/// Environment variable for the Dropbox app client id
pub const ENV_DROPBOX_CLIENT_ID: &str = "AUTOHCK_DROPBOX_CLIENT_ID";

/// Environment variable for the Dropbox app client secret
pub const ENV_DROPBOX_CLIENT_SECRET: &str = "AUTOHCK_DROPBOX_CLIENT_SECRET";
