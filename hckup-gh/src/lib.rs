//! # GitHub API Client
//!
//! Provides GitHub REST API integration for pull requests and commit
//! statuses, supporting authentication and the operations the hckup
//! upload workflow needs.

pub mod client;
pub mod consts;
pub mod endpoints;
pub mod models;

// Re-export the client
pub use client::{GitHubClient, create_github_client};
// Re-export models
pub use models::{
  CombinedStatus, CommitStatus, CreateStatusRequest, GitHubAuth, GitHubPullRequest, GitHubUser, PullRequestRef,
  StatusState,
};
