//! # Dropbox API Endpoints
//!
//! Organized endpoint implementations for the Dropbox resources the upload
//! workflow touches: file/folder operations and shared links.

pub mod files;
pub mod sharing;
