// src/github/repository.rs
// =============================================================================
// Repository identity and page slugs.
//
// - RepositoryReference: "owner/name", parsed from a short form or a URL
// - Slug: the public URL path of a documentation page
//
// Slug rules, for repository acme/widgets and content root "docs":
//   docs/intro.mdx         -> /acme/widgets/intro
//   docs/guides/index.mdx  -> /acme/widgets/guides
//   docs/index.mdx         -> /acme/widgets
// =============================================================================

use serde::Serialize;
use std::fmt;

use crate::config::DocsLayout;
use crate::error::{Error, Result};

/// Identifies a remote repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryReference {
    pub owner: String,
    pub name: String,
}

impl RepositoryReference {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    // Parses a repository reference
    //
    // Supported formats:
    //   - owner/name
    //   - https://github.com/owner/name
    //   - https://github.com/owner/name.git
    //   - github.com/owner/name
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();

        let without_scheme = trimmed
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_start_matches("www.");

        let (path, is_url) = match without_scheme.strip_prefix("github.com/") {
            Some(rest) => (rest, true),
            // A URL, but not a GitHub one
            None if without_scheme.len() != trimmed.len() || without_scheme.contains("://") => {
                return Err(Error::InvalidRepository(input.to_string()));
            }
            None => (without_scheme, false),
        };

        let mut parts = path.trim_end_matches('/').split('/');
        let owner = parts.next().unwrap_or_default();
        let name = parts.next().unwrap_or_default();
        let name = name.strip_suffix(".git").unwrap_or(name);

        // A bare "owner/name" must have exactly two segments; URLs may
        // carry more (e.g. /tree/main/docs) and we ignore the rest.
        let extra_segments = parts.next().is_some();

        // GitHub logins never contain dots, hosts always do
        if owner.is_empty()
            || owner.contains('.')
            || name.is_empty()
            || (extra_segments && !is_url)
        {
            return Err(Error::InvalidRepository(input.to_string()));
        }

        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for RepositoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Public URL path of a documentation page.
///
/// Always starts with `/owner/name`, never ends with `/index`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Turns a repository-relative page path into its slug
//
// Steps:
//   1. strip the page extension ("docs/guides/index.mdx" -> "docs/guides/index")
//   2. strip the content root    ("docs/guides/index"     -> "guides/index")
//   3. collapse an index page     ("guides/index"          -> "guides")
//   4. prefix with the repository ("guides"                -> "/acme/widgets/guides")
pub fn slugify(repository: &RepositoryReference, path: &str, layout: &DocsLayout) -> Slug {
    let path = path.trim_start_matches('/');
    let path = path.strip_suffix(&layout.page_extension).unwrap_or(path);

    let relative = if layout.content_root.is_empty() {
        path
    } else {
        path.strip_prefix(&layout.content_root)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(path)
    };

    // "a/index/index.mdx" is still an index page of "a"
    let mut relative = relative.trim_matches('/');
    while let Some(parent) = relative.strip_suffix("/index") {
        relative = parent;
    }
    if relative == "index" {
        relative = "";
    }

    if relative.is_empty() {
        Slug(format!("/{}/{}", repository.owner, repository.name))
    } else {
        Slug(format!(
            "/{}/{}/{}",
            repository.owner, repository.name, relative
        ))
    }
}
