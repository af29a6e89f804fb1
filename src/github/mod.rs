// src/github/mod.rs
// =============================================================================
// This module reads documentation straight out of GitHub repositories
// through the GraphQL API.
//
// Submodules:
// - client: Executes GraphQL queries (the only place that does HTTP)
// - repository: Repository references and page slugs
// - paths: Walks a repository tree to find every page
// - pull_request: Resolves a pull request to its head branch
// - contents: Fetches a page and the docs config at a ref
//
// Every query operation degrades instead of failing: discovery returns what
// it found, the resolver and fetcher return None.
// =============================================================================

mod client;
mod contents;
mod paths;
mod pull_request;
mod repository;

pub use client::GraphQlClient;
pub use contents::{fetch_contents, SourceDescriptor};
pub use paths::discover_paths;
pub use pull_request::resolve_pull_request;
