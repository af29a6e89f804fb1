// src/config.rs
// =============================================================================
// Runtime configuration.
//
// Two pieces live here:
// - Config: where the GraphQL endpoint is and how to talk to it
// - DocsLayout: where documentation lives inside a repository
//
// Values come from CLI flags, which fall back to environment variables
// (see cli.rs), so this module only validates and assembles them.
// =============================================================================

use anyhow::{anyhow, Result};
use std::time::Duration;
use url::Url;

use crate::cli::GlobalArgs;

/// GitHub's public GraphQL endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

/// Everything the GraphQL client needs to make requests.
#[derive(Debug, Clone)]
pub struct Config {
    /// GraphQL endpoint every query is POSTed to
    pub endpoint: Url,
    /// Bearer token; GitHub rejects anonymous GraphQL requests
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Documentation conventions shared by discovery and fetching
    pub layout: DocsLayout,
}

impl Config {
    // Builds a Config from parsed CLI arguments
    //
    // Fails if the endpoint is not a valid http(s) URL
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let endpoint = Url::parse(&args.endpoint)
            .map_err(|e| anyhow!("Invalid GraphQL endpoint '{}': {}", args.endpoint, e))?;

        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            return Err(anyhow!(
                "GraphQL endpoint must be http or https: {}",
                args.endpoint
            ));
        }

        let token = args
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        Ok(Self {
            endpoint,
            token,
            timeout: Duration::from_secs(args.timeout_secs),
            layout: DocsLayout::with_content_root(&args.content_root),
        })
    }

    /// A config pointing at `endpoint` with default settings.
    #[cfg(test)]
    pub fn for_endpoint(endpoint: &str) -> Self {
        Self {
            endpoint: Url::parse(endpoint).expect("test endpoint must be a valid URL"),
            token: None,
            timeout: Duration::from_secs(5),
            layout: DocsLayout::default(),
        }
    }
}

/// Where documentation lives inside a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsLayout {
    /// Directory holding the pages, relative to the repository root
    pub content_root: String,
    /// JSON config blob at the repository root
    pub config_file: String,
    /// Extension (with the leading dot) that marks a documentation page
    pub page_extension: String,
}

impl Default for DocsLayout {
    fn default() -> Self {
        Self {
            content_root: "docs".to_string(),
            config_file: "docs.json".to_string(),
            page_extension: ".mdx".to_string(),
        }
    }
}

impl DocsLayout {
    // Default layout with a different content root
    //
    // Leading and trailing slashes are ignored: "/docs/" and "docs" are
    // the same root.
    pub fn with_content_root(root: &str) -> Self {
        Self {
            content_root: root.trim_matches('/').to_string(),
            ..Self::default()
        }
    }

    // Git object expression for the config blob at a ref
    // Example: "main" -> "main:docs.json"
    pub fn config_expression(&self, git_ref: &str) -> String {
        format!("{}:{}", git_ref, self.config_file)
    }

    // Git object expression for a page at a ref
    // Example: ("main", "guides/intro") -> "main:docs/guides/intro.mdx"
    //
    // An empty content root means pages live at the repository root.
    pub fn page_expression(&self, git_ref: &str, path: &str) -> String {
        let path = path.trim_matches('/');

        if self.content_root.is_empty() {
            format!("{}:{}{}", git_ref, path, self.page_extension)
        } else {
            format!(
                "{}:{}/{}{}",
                git_ref, self.content_root, path, self.page_extension
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(endpoint: &str, token: Option<&str>) -> GlobalArgs {
        GlobalArgs {
            token: token.map(str::to_string),
            endpoint: endpoint.to_string(),
            timeout_secs: 30,
            content_root: "docs".to_string(),
        }
    }

    #[test]
    fn test_default_layout_expressions() {
        let layout = DocsLayout::default();
        assert_eq!(layout.config_expression("main"), "main:docs.json");
        assert_eq!(
            layout.page_expression("feature-x", "guides/intro"),
            "feature-x:docs/guides/intro.mdx"
        );
    }

    #[test]
    fn test_content_root_slashes_are_trimmed() {
        let layout = DocsLayout::with_content_root("/site/docs/");
        assert_eq!(layout.content_root, "site/docs");
        assert_eq!(layout.page_expression("HEAD", "/intro"), "HEAD:site/docs/intro.mdx");
    }

    #[test]
    fn test_empty_content_root_reads_from_repository_root() {
        for root in ["", "/", "//"] {
            let layout = DocsLayout::with_content_root(root);
            assert_eq!(layout.content_root, "");
            assert_eq!(layout.page_expression("HEAD", "intro"), "HEAD:intro.mdx");
            assert_eq!(
                layout.page_expression("main", "/guides/setup/"),
                "main:guides/setup.mdx"
            );
        }
    }

    #[test]
    fn test_from_args() {
        let config = Config::from_args(&args(DEFAULT_ENDPOINT, Some("  abc123 "))).unwrap();
        assert_eq!(config.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(config.token.as_deref(), Some("abc123"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = Config::from_args(&args(DEFAULT_ENDPOINT, Some("   "))).unwrap();
        assert!(config.token.is_none());
    }

    #[test]
    fn test_invalid_endpoint() {
        assert!(Config::from_args(&args("not a url", None)).is_err());
        assert!(Config::from_args(&args("ftp://example.com/graphql", None)).is_err());
    }
}
