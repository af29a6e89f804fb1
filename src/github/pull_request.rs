// src/github/pull_request.rs
// =============================================================================
// Resolves a pull request to the branch it was opened from.
//
// A pull request's head may live in a fork, so we need three things to read
// its files: the head repository's owner, its name, and the head branch.
//
// Any failure (bad number, missing repository or PR, deleted fork, network
// error) resolves to None. Callers fall back to the default branch.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::client::GraphQlClient;
use crate::error::{Error, Result};

const PULL_REQUEST_QUERY: &str = r#"
query PullRequestHead($owner: String!, $repository: String!, $pullRequest: Int!) {
  repository(owner: $owner, name: $repository) {
    pullRequest(number: $pullRequest) {
      owner: headRepositoryOwner {
        login
      }
      repository: headRepository {
        name
      }
      ref: headRef {
        name
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestVariables<'a> {
    owner: &'a str,
    repository: &'a str,
    pull_request: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestQuery {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    pull_request: Option<PullRequestNode>,
}

// Each field is null once the fork or branch has been deleted
#[derive(Debug, Deserialize)]
struct PullRequestNode {
    owner: Option<Login>,
    repository: Option<Name>,
    #[serde(rename = "ref")]
    head_ref: Option<Name>,
}

#[derive(Debug, Deserialize)]
struct Login {
    login: String,
}

#[derive(Debug, Deserialize)]
struct Name {
    name: String,
}

/// Where a pull request's changes live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestMetadata {
    /// Owner of the head repository (may differ from the base owner)
    pub owner: String,
    /// Name of the head repository
    pub repository: String,
    /// Head branch name
    #[serde(rename = "ref")]
    pub git_ref: String,
}

// Resolves the head of pull request `pull_request` in owner/repository
//
// Parameters:
//   pull_request: the PR number as typed by a user, e.g. "42"
//
// Returns: None if the number is invalid or the PR cannot be resolved
#[instrument(skip(client))]
pub async fn resolve_pull_request(
    client: &GraphQlClient,
    owner: &str,
    repository: &str,
    pull_request: &str,
) -> Option<PullRequestMetadata> {
    match query_pull_request(client, owner, repository, pull_request).await {
        Ok(Some(metadata)) => Some(metadata),
        Ok(None) => {
            debug!("Pull request not found or its head is gone");
            None
        }
        Err(e) => {
            debug!("Could not resolve pull request: {}", e);
            None
        }
    }
}

async fn query_pull_request(
    client: &GraphQlClient,
    owner: &str,
    repository: &str,
    pull_request: &str,
) -> Result<Option<PullRequestMetadata>> {
    let number = parse_pull_request_number(pull_request)?;

    let variables = PullRequestVariables {
        owner,
        repository,
        pull_request: number,
    };

    let response: PullRequestQuery = client.execute(PULL_REQUEST_QUERY, variables).await?;

    let Some(pull_request) = response
        .repository
        .and_then(|repository| repository.pull_request)
    else {
        return Ok(None);
    };

    Ok(match (pull_request.owner, pull_request.repository, pull_request.head_ref) {
        (Some(owner), Some(repository), Some(head_ref)) => Some(PullRequestMetadata {
            owner: owner.login,
            repository: repository.name,
            git_ref: head_ref.name,
        }),
        _ => None,
    })
}

// Pull request numbers are positive integers ("42", not "#42" or "0")
fn parse_pull_request_number(input: &str) -> Result<u64> {
    match input.trim().parse::<u64>() {
        Ok(number) if number > 0 => Ok(number),
        _ => Err(Error::InvalidPullRequestNumber(input.to_string())),
    }
}
