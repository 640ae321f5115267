//! # Dropbox API Client
//!
//! Provides Dropbox HTTP API integration for folder creation, shared links,
//! and content upload, plus the OAuth code-exchange and token-refresh flows
//! the hckup upload workflow uses to establish its storage session.

pub mod auth;
pub mod client;
pub mod consts;
pub mod endpoints;
pub mod models;

// Re-export the client and authenticator
pub use auth::DropboxAuthenticator;
pub use client::DropboxClient;
// Re-export models
pub use models::{Account, SharedLinkMetadata, StoredToken};
