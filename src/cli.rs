// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every subcommand maps onto one query operation:
// - paths         -> discover every page of a repository
// - pull-request  -> resolve a PR to its head branch
// - contents      -> fetch a page plus the docs config at a ref
// - badge         -> render the ref badge HTML
//
// Connection settings are global flags that fall back to environment
// variables, so CI can configure them once.
// =============================================================================

use clap::{Args, Parser, Subcommand};

use crate::badge::SourceType;
use crate::config::DEFAULT_ENDPOINT;

#[derive(Parser, Debug)]
#[command(
    name = "docs-source",
    version,
    about = "Discover and fetch documentation pages straight from GitHub repositories",
    long_about = "docs-source reads documentation from GitHub at request time: it lists every \
                  page of a repository, resolves pull requests to their head branch, and fetches \
                  page text and the docs config at any ref."
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and layout settings shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// GitHub token used as a bearer token for GraphQL requests
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// GraphQL endpoint
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_ENDPOINT, global = true)]
    pub endpoint: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "DOCS_SOURCE_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// Directory holding the documentation pages
    #[arg(long, default_value = "docs", global = true)]
    pub content_root: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the slug of every documentation page in a repository
    ///
    /// Example: docs-source paths acme/widgets
    Paths {
        /// Repository as owner/name or a GitHub URL
        repository: String,

        /// Directory to start from (defaults to the content root)
        #[arg(long)]
        dir: Option<String>,

        /// Output results in JSON format instead of one slug per line
        #[arg(long)]
        json: bool,
    },

    /// Resolve a pull request to the owner, repository and branch of its head
    ///
    /// Example: docs-source pull-request acme widgets 42
    PullRequest {
        owner: String,
        repository: String,
        /// Pull request number
        number: String,

        #[arg(long)]
        json: bool,
    },

    /// Fetch a page and the docs config at a ref
    ///
    /// Example: docs-source contents acme widgets guides/intro --ref main
    Contents {
        owner: String,
        repository: String,
        /// Page path relative to the content root, without extension
        path: String,

        /// Branch, tag or commit to read from (defaults to HEAD)
        #[arg(long = "ref", conflicts_with = "pull_request")]
        git_ref: Option<String>,

        /// Read from the head of this pull request instead
        #[arg(long)]
        pull_request: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Render the ref badge as HTML
    ///
    /// Example: docs-source badge acme widgets 7 --type pr
    Badge {
        owner: String,
        repository: String,
        /// Branch name, commit SHA or pull request number
        git_ref: String,

        #[arg(long = "type", value_enum, default_value_t = SourceType::Branch)]
        source_type: SourceType,
    },
}
