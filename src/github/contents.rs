// src/github/contents.rs
// =============================================================================
// Fetches everything needed to render one documentation page.
//
// A single query asks for four things at a given ref:
// - the repository's default branch name
// - whether the repository is a fork
// - the text of the config blob (docs.json)
// - the text of the page itself (docs/<path>.mdx)
//
// A missing config or page is not an error: the field is just None. Only a
// failure of the whole query (e.g. the repository does not exist) yields
// None for the whole result.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::client::GraphQlClient;
use super::pull_request::{resolve_pull_request, PullRequestMetadata};
use crate::error::Result;

const PAGE_CONTENTS_QUERY: &str = r#"
query PageContents($owner: String!, $repository: String!, $config: String!, $mdx: String!) {
  repository(owner: $owner, name: $repository) {
    baseBranch: defaultBranchRef {
      name
    }
    isFork
    config: object(expression: $config) {
      ... on Blob {
        text
      }
    }
    md: object(expression: $mdx) {
      ... on Blob {
        text
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
struct ContentsVariables<'a> {
    owner: &'a str,
    repository: &'a str,
    config: String,
    mdx: String,
}

#[derive(Debug, Deserialize)]
struct PageContentsQuery {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    // Null for a repository without any commits
    base_branch: Option<BranchNode>,
    is_fork: bool,
    config: Option<BlobNode>,
    md: Option<BlobNode>,
}

#[derive(Debug, Deserialize)]
struct BranchNode {
    name: String,
}

// `text` is null for binary blobs and absent when the expression
// resolved to a tree
#[derive(Debug, Deserialize)]
struct BlobNode {
    #[serde(default)]
    text: Option<String>,
}

/// Which file, at which ref, in which repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    pub owner: String,
    pub repository: String,
    /// Branch, tag, commit SHA or "HEAD"
    #[serde(rename = "ref")]
    pub git_ref: String,
    /// Page path relative to the content root, without extension
    pub path: String,
}

impl SourceDescriptor {
    pub fn new(
        owner: impl Into<String>,
        repository: impl Into<String>,
        git_ref: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repository: repository.into(),
            git_ref: git_ref.into(),
            path: path.into(),
        }
    }

    /// The same page, read from a pull request's head branch.
    pub fn from_pull_request(metadata: PullRequestMetadata, path: impl Into<String>) -> Self {
        Self {
            owner: metadata.owner,
            repository: metadata.repository,
            git_ref: metadata.git_ref,
            path: path.into(),
        }
    }

    // Works out which ref a page should be read from
    //
    // Order of preference:
    //   1. the head of `pull_request`, if it resolves
    //   2. `git_ref` on owner/repository
    //   3. HEAD (the default branch) of owner/repository
    //
    // A pull request that cannot be resolved falls back to the default
    // branch of the base repository.
    pub async fn resolve(
        client: &GraphQlClient,
        owner: String,
        repository: String,
        path: String,
        git_ref: Option<String>,
        pull_request: Option<String>,
    ) -> Self {
        if let Some(number) = pull_request {
            match resolve_pull_request(client, &owner, &repository, &number).await {
                Some(metadata) => {
                    info!(
                        "Reading pull request #{} from {}/{}@{}",
                        number, metadata.owner, metadata.repository, metadata.git_ref
                    );
                    return Self::from_pull_request(metadata, path);
                }
                None => {
                    warn!(
                        "Could not resolve pull request #{}, falling back to the default branch",
                        number
                    );
                    return Self::new(owner, repository, "HEAD", path);
                }
            }
        }

        Self::new(owner, repository, git_ref.unwrap_or_else(|| "HEAD".to_string()), path)
    }
}

/// Result of a content fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contents {
    pub is_fork: bool,
    /// Default branch name
    pub base_branch: String,
    /// Text of the config blob, if it exists at the ref
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<String>,
    /// Text of the page, if it exists at the ref
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md: Option<String>,
}

// Fetches the repository facts, config and page text for `source`
//
// Returns: None only if the query as a whole fails
#[instrument(skip(client, source), fields(owner = %source.owner, repository = %source.repository, git_ref = %source.git_ref))]
pub async fn fetch_contents(client: &GraphQlClient, source: &SourceDescriptor) -> Option<Contents> {
    match query_contents(client, source).await {
        Ok(Some(contents)) => {
            debug!(
                has_config = contents.config.is_some(),
                has_page = contents.md.is_some(),
                "Fetched contents"
            );
            Some(contents)
        }
        Ok(None) => {
            debug!("Repository not found or empty");
            None
        }
        Err(e) => {
            debug!("Could not fetch contents: {}", e);
            None
        }
    }
}

async fn query_contents(client: &GraphQlClient, source: &SourceDescriptor) -> Result<Option<Contents>> {
    let layout = client.layout();

    let variables = ContentsVariables {
        owner: &source.owner,
        repository: &source.repository,
        config: layout.config_expression(&source.git_ref),
        mdx: layout.page_expression(&source.git_ref, &source.path),
    };

    let response: PageContentsQuery = client.execute(PAGE_CONTENTS_QUERY, variables).await?;

    let Some(repository) = response.repository else {
        return Ok(None);
    };

    // Without a default branch there is nothing to fall back to
    let Some(base_branch) = repository.base_branch else {
        return Ok(None);
    };

    Ok(Some(Contents {
        is_fork: repository.is_fork,
        base_branch: base_branch.name,
        config: repository.config.and_then(|blob| blob.text),
        md: repository.md.and_then(|blob| blob.text),
    }))
}
