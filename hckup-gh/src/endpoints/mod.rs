//! # GitHub API Endpoints
//!
//! Organized endpoint implementations for the GitHub resources the upload
//! workflow touches: pull requests and commit statuses.

pub mod pulls;
pub mod statuses;
