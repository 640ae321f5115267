use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents GitHub authentication credentials
#[derive(Clone)]
pub struct GitHubAuth {
  pub username: String,
  pub token: String,
}

/// Represents a GitHub user
#[derive(Debug, Deserialize)]
pub struct GitHubUser {
  pub login: String,
  pub id: u64,
  pub name: Option<String>,
}

/// Represents a GitHub pull request
#[derive(Debug, Deserialize)]
pub struct GitHubPullRequest {
  pub number: u32,
  pub title: String,
  pub html_url: String,
  pub state: String,
  pub user: GitHubUser,
  pub head: PullRequestRef,
  pub base: PullRequestRef,
}

/// Represents a GitHub pull request reference (head or base)
#[derive(Debug, Deserialize)]
pub struct PullRequestRef {
  pub label: Option<String>,
  #[serde(rename = "ref")]
  pub ref_name: Option<String>,
  pub sha: String,
}

/// State of a commit status check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
  Pending,
  Success,
  Failure,
  Error,
}

impl StatusState {
  pub const fn as_str(&self) -> &'static str {
    match self {
      StatusState::Pending => "pending",
      StatusState::Success => "success",
      StatusState::Failure => "failure",
      StatusState::Error => "error",
    }
  }
}

impl fmt::Display for StatusState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for StatusState {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "pending" => Ok(StatusState::Pending),
      "success" => Ok(StatusState::Success),
      "failure" => Ok(StatusState::Failure),
      "error" => Ok(StatusState::Error),
      other => Err(anyhow::anyhow!(
        "Invalid status state '{other}'. Expected one of: pending, success, failure, error"
      )),
    }
  }
}

/// Represents a single status check posted against a commit
#[derive(Debug, Clone, Deserialize)]
pub struct CommitStatus {
  pub context: String,
  pub description: Option<String>,
  pub state: StatusState,
  pub target_url: Option<String>,
  pub created_at: Option<String>,
}

/// Represents a commit's combined status: the aggregation of all status
/// checks posted against it
#[derive(Debug, Deserialize)]
pub struct CombinedStatus {
  pub state: String,
  pub sha: String,
  pub statuses: Vec<CommitStatus>,
}

/// Payload for creating a commit status
#[derive(Debug, Clone, Serialize)]
pub struct CreateStatusRequest {
  pub state: StatusState,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub target_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  pub context: String,
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_github_auth() {
    let auth = GitHubAuth {
      username: "test_user".to_string(),
      token: "test_token".to_string(),
    };

    assert_eq!(auth.username, "test_user");
    assert_eq!(auth.token, "test_token");
  }

  #[test]
  fn test_github_pull_request_deserialization() {
    let json = json!({
        "number": 1347,
        "title": "Amazing new feature",
        "html_url": "https://github.com/octocat/Hello-World/pull/1347",
        "state": "open",
        "user": {
            "login": "octocat",
            "id": 1,
            "name": "The Octocat"
        },
        "head": {
            "label": "octocat:new-feature",
            "ref": "new-feature",
            "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e"
        },
        "base": {
            "label": "octocat:master",
            "ref": "master",
            "sha": "3cb09b5b57875f334f61aebed695e2e4193db5a"
        }
    });

    let pr: GitHubPullRequest = serde_json::from_value(json).unwrap();

    assert_eq!(pr.number, 1347);
    assert_eq!(pr.title, "Amazing new feature");
    assert_eq!(pr.state, "open");
    assert_eq!(pr.head.sha, "6dcb09b5b57875f334f61aebed695e2e4193db5e");
    assert_eq!(pr.head.ref_name, Some("new-feature".to_string()));
  }

  #[test]
  fn test_status_state_round_trip() {
    for (state, text) in [
      (StatusState::Pending, "\"pending\""),
      (StatusState::Success, "\"success\""),
      (StatusState::Failure, "\"failure\""),
      (StatusState::Error, "\"error\""),
    ] {
      assert_eq!(serde_json::to_string(&state).unwrap(), text);
      assert_eq!(serde_json::from_str::<StatusState>(text).unwrap(), state);
    }
  }

  #[test]
  fn test_status_state_from_str() {
    assert_eq!("success".parse::<StatusState>().unwrap(), StatusState::Success);
    assert!("done".parse::<StatusState>().is_err());
  }

  #[test]
  fn test_combined_status_deserialization() {
    let json = json!({
        "state": "pending",
        "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
        "statuses": [
            {
                "context": "HCK-CI",
                "description": "Running tests",
                "state": "pending",
                "target_url": "https://ci.example.com/build/1",
                "created_at": "2023-01-01T00:00:00Z"
            },
            {
                "context": "coverage",
                "description": null,
                "state": "success",
                "target_url": null,
                "created_at": "2023-01-01T00:05:00Z"
            }
        ]
    });

    let combined: CombinedStatus = serde_json::from_value(json).unwrap();

    assert_eq!(combined.state, "pending");
    assert_eq!(combined.statuses.len(), 2);
    assert_eq!(combined.statuses[0].context, "HCK-CI");
    assert_eq!(combined.statuses[0].state, StatusState::Pending);
    assert_eq!(combined.statuses[1].target_url, None);
  }

  #[test]
  fn test_create_status_request_serialization() {
    let request = CreateStatusRequest {
      state: StatusState::Success,
      target_url: Some("https://www.dropbox.com/sh/abc".to_string()),
      description: None,
      context: "HCK-CI".to_string(),
    };

    let json = serde_json::to_value(&request).unwrap();

    // Absent fields are omitted entirely, never serialized as null
    assert_eq!(
      json,
      json!({
          "state": "success",
          "target_url": "https://www.dropbox.com/sh/abc",
          "context": "HCK-CI"
      })
    );
  }
}
