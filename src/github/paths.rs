// src/github/paths.rs
// =============================================================================
// Discovers every documentation page in a repository.
//
// How it works:
// 1. Ask GitHub for the tree entries at HEAD:<directory>
// 2. Each .mdx blob becomes a slug
// 3. Each sub-tree is walked the same way
// 4. Results are concatenated in entry order (depth-first, pre-order)
//
// Sibling sub-trees are independent, so they are fetched concurrently.
// `buffered` keeps the output in input order, so the result is exactly what
// a sequential walk would produce. A semaphore shared by the whole walk caps
// the number of listings in flight, however deep the tree is.
//
// Failures never abort the walk: a directory that cannot be listed
// contributes nothing, and everything found elsewhere is still returned.
//
// Rust concepts:
// - BoxFuture: A recursive async function needs a boxed (sized) future
// - buffered: Run up to N futures at once, yielding results in order
// - Semaphore: Counts permits so only N requests hold one at a time
// =============================================================================

use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, error, instrument, warn};

use super::client::GraphQlClient;
use super::repository::{slugify, RepositoryReference, Slug};
use crate::config::DocsLayout;
use crate::error::Result;

// Most directory listings in flight at once for one discovery. GitHub's
// secondary rate limits reject bursts of concurrent GraphQL requests.
const MAX_CONCURRENT_LISTINGS: usize = 8;

const REPOSITORY_PATHS_QUERY: &str = r#"
query RepositoryPaths($owner: String!, $repository: String!, $path: String!) {
  repository(owner: $owner, name: $repository) {
    object(expression: $path) {
      ... on Tree {
        entries {
          name
          extension
          type
          path
        }
      }
    }
  }
}
"#;

#[derive(Debug, Serialize)]
struct PathsVariables<'a> {
    owner: &'a str,
    repository: &'a str,
    path: String,
}

// Null repository = repository not found
#[derive(Debug, Deserialize)]
struct RepositoryPathsQuery {
    repository: Option<RepositoryObject>,
}

// Null object = path not found
#[derive(Debug, Deserialize)]
struct RepositoryObject {
    object: Option<TreeObject>,
}

// A path that resolves to a blob matches no `... on Tree` fields and
// comes back as `{}`, which we treat as an empty directory.
#[derive(Debug, Deserialize)]
struct TreeObject {
    #[serde(default)]
    entries: Vec<TreeEntry>,
}

/// What kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// A file
    Blob,
    /// A directory
    Tree,
    /// Submodules ("commit") and anything GitHub adds later
    #[serde(other)]
    Other,
}

/// One entry of a repository tree.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    /// Extension including the dot, e.g. ".mdx"; null for extensionless files
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Path relative to the repository root
    pub path: String,
}

impl TreeEntry {
    // Is this entry a documentation page?
    fn is_page(&self, layout: &DocsLayout) -> bool {
        if self.kind != EntryKind::Blob {
            return false;
        }

        match &self.extension {
            Some(extension) => *extension == layout.page_extension,
            None => self.path.ends_with(&layout.page_extension),
        }
    }
}

// Discovers the slugs of every page under `directory`
//
// Parameters:
//   client: GraphQL client (its layout decides what counts as a page)
//   repository: "owner/name" or a GitHub URL
//   directory: repository-relative directory to start from, e.g. "docs"
//
// Returns: slugs in pre-order; empty if nothing could be listed
#[instrument(skip(client))]
pub async fn discover_paths(client: &GraphQlClient, repository: &str, directory: &str) -> Vec<Slug> {
    let repository = match RepositoryReference::parse(repository) {
        Ok(repository) => repository,
        Err(e) => {
            error!("{}", e);
            return Vec::new();
        }
    };

    let permits = Semaphore::new(MAX_CONCURRENT_LISTINGS);
    let slugs = walk(client, &repository, &permits, directory.trim_matches('/').to_string()).await;
    debug!(count = slugs.len(), "Discovered documentation pages");
    slugs
}

// Walks one directory level and recurses into sub-trees
fn walk<'a>(
    client: &'a GraphQlClient,
    repository: &'a RepositoryReference,
    permits: &'a Semaphore,
    directory: String,
) -> BoxFuture<'a, Vec<Slug>> {
    async move {
        // The permit is held for the request only, never across the
        // recursion, so parents cannot starve their children.
        let listing = {
            let _permit = permits.acquire().await.ok();
            list_entries(client, repository, &directory).await
        };

        let entries = match listing {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                warn!(%repository, %directory, "Repository or directory not found");
                return Vec::new();
            }
            Err(e) => {
                error!(%repository, %directory, "Failed to list directory: {}", e);
                return Vec::new();
            }
        };

        let layout = client.layout();

        let branches = entries
            .into_iter()
            .map(|entry| -> BoxFuture<'a, Vec<Slug>> {
                if entry.is_page(layout) {
                    let slug = slugify(repository, &entry.path, layout);
                    debug!(name = %entry.name, %slug, "Found page");
                    future::ready(vec![slug]).boxed()
                } else if entry.kind == EntryKind::Tree {
                    walk(client, repository, permits, entry.path)
                } else {
                    future::ready(Vec::new()).boxed()
                }
            })
            .collect::<Vec<_>>();

        stream::iter(branches)
            .buffered(MAX_CONCURRENT_LISTINGS)
            .concat()
            .await
    }
    .boxed()
}

// Lists the entries of one directory at HEAD
//
// Returns: Ok(None) if the repository or the directory does not exist
async fn list_entries(
    client: &GraphQlClient,
    repository: &RepositoryReference,
    directory: &str,
) -> Result<Option<Vec<TreeEntry>>> {
    let variables = PathsVariables {
        owner: &repository.owner,
        repository: &repository.name,
        path: format!("HEAD:{}", directory),
    };

    let response: RepositoryPathsQuery = client.execute(REPOSITORY_PATHS_QUERY, variables).await?;

    Ok(response
        .repository
        .and_then(|repository| repository.object)
        .map(|tree| tree.entries))
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why BoxFuture?
//    - An async fn that calls itself would have an infinitely sized future
//    - Boxing puts each level's future on the heap, giving it a known size
//    - .boxed() comes from FutureExt and also requires the future to be Send
//
// 2. Why not a work queue like a crawler?
//    - A repository tree cannot contain cycles, so there is no visited set
//    - Recursion depth equals directory depth, which is small in practice
// -----------------------------------------------------------------------------
