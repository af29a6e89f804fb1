// src/badge/render.rs
// =============================================================================
// Renders the ref badge as an HTML fragment.
//
// Label per source type:
//   branch -> the branch name         ("main")
//   commit -> the first 7 characters  ("3f2a9c1")
//   PR     -> "PR #<number>"          ("PR #7")
//
// Colour per source type: green for branches, blue for commits, orange for
// pull requests. Class names are kept stable because page fixtures compare
// them.
//
// Rust concepts:
// - watch::Receiver: Always holds the latest value a sender published
// - Option<String>: "render nothing" is None, not an empty string
// =============================================================================

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use url::Url;

const BASE_CLASSES: &str = "rounded py-1 px-3 text-sm text-white transition";

/// What kind of ref is being viewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
pub enum SourceType {
    #[serde(rename = "branch")]
    Branch,
    #[serde(rename = "commit")]
    Commit,
    #[serde(rename = "PR")]
    #[value(name = "pr")]
    PullRequest,
}

impl SourceType {
    fn color_classes(self) -> &'static str {
        match self {
            SourceType::Branch => "bg-green-500 hover:bg-green-400",
            SourceType::Commit => "bg-blue-500 hover:bg-blue-400",
            SourceType::PullRequest => "bg-orange-500 hover:bg-orange-400",
        }
    }

    fn label(self, git_ref: &str) -> String {
        match self {
            SourceType::Branch => git_ref.to_string(),
            SourceType::Commit => git_ref.chars().take(7).collect(),
            SourceType::PullRequest => format!("PR #{}", git_ref),
        }
    }
}

/// The page state the badge reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefContext {
    /// Branch name, commit SHA or PR number; None when not viewing a ref
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
    /// Link target, usually the ref's page on github.com
    pub github_ref_path: String,
    pub source: SourceType,
}

impl RefContext {
    // Builds a context for a ref of owner/repository
    //
    // The link points at the matching github.com page:
    //   branch -> https://github.com/acme/widgets/tree/main
    //   commit -> https://github.com/acme/widgets/commit/<sha>
    //   PR     -> https://github.com/acme/widgets/pull/7
    pub fn new(owner: &str, repository: &str, git_ref: &str, source: SourceType) -> Self {
        let kind = match source {
            SourceType::Branch => "tree",
            SourceType::Commit => "commit",
            SourceType::PullRequest => "pull",
        };

        Self {
            git_ref: Some(git_ref.to_string()).filter(|r| !r.is_empty()),
            github_ref_path: github_url(owner, repository, kind, git_ref),
            source,
        }
    }
}

// Builds a github.com link, percent-encoding every path segment
//
// Slashes in a branch name separate segments ("feature/docs" stays
// readable); anything else URL-significant ('#', '?', ' ') is encoded.
fn github_url(owner: &str, repository: &str, kind: &str, git_ref: &str) -> String {
    // Constant input, so parsing cannot fail
    let mut url = Url::parse("https://github.com/").expect("github.com is a valid URL");

    if let Ok(mut segments) = url.path_segments_mut() {
        segments
            .clear()
            .push(owner)
            .push(repository)
            .push(kind)
            .extend(git_ref.split('/'));
    }

    url.into()
}

// Renders the badge for `context`
//
// Returns: None when there is no ref to show
pub fn render_badge(context: &RefContext) -> Option<String> {
    let git_ref = context.git_ref.as_deref().filter(|r| !r.is_empty())?;

    Some(format!(
        r#"<a href="{}" class="{} {}">{}</a>"#,
        html_escape::encode_double_quoted_attribute(&context.github_ref_path),
        BASE_CLASSES,
        context.source.color_classes(),
        html_escape::encode_text(&context.source.label(git_ref)),
    ))
}

/// A badge bound to an externally owned context.
#[derive(Debug, Clone)]
pub struct RefBadge {
    context: watch::Receiver<RefContext>,
}

impl RefBadge {
    pub fn new(context: watch::Receiver<RefContext>) -> Self {
        Self { context }
    }

    /// Renders the badge for the context's current value.
    pub fn render(&self) -> Option<String> {
        render_badge(&self.context.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    // Returns (href, class, text) of the single rendered link
    fn parse(html: &str) -> (String, String, String) {
        let fragment = Html::parse_fragment(html);
        let selector = Selector::parse("a").unwrap();
        let links: Vec<_> = fragment.select(&selector).collect();
        assert_eq!(links.len(), 1, "expected exactly one link in {}", html);

        let link = links[0];
        (
            link.value().attr("href").unwrap_or_default().to_string(),
            link.value().attr("class").unwrap_or_default().to_string(),
            link.text().collect(),
        )
    }

    #[test]
    fn test_no_ref_renders_nothing() {
        let context = RefContext {
            git_ref: None,
            github_ref_path: String::new(),
            source: SourceType::Branch,
        };
        assert_eq!(render_badge(&context), None);

        let context = RefContext::new("acme", "widgets", "", SourceType::Branch);
        assert_eq!(render_badge(&context), None);
    }

    #[test]
    fn test_pull_request_badge() {
        let context = RefContext::new("acme", "widgets", "7", SourceType::PullRequest);
        let (href, class, text) = parse(&render_badge(&context).unwrap());

        assert_eq!(href, "https://github.com/acme/widgets/pull/7");
        assert_eq!(
            class,
            "rounded py-1 px-3 text-sm text-white transition bg-orange-500 hover:bg-orange-400"
        );
        assert_eq!(text, "PR #7");
    }

    #[test]
    fn test_branch_badge() {
        let context = RefContext::new("acme", "widgets", "feature/docs", SourceType::Branch);
        let (href, class, text) = parse(&render_badge(&context).unwrap());

        assert_eq!(href, "https://github.com/acme/widgets/tree/feature/docs");
        assert!(class.contains("bg-green-500"));
        assert!(!class.contains("bg-blue-500"));
        assert_eq!(text, "feature/docs");
    }

    #[test]
    fn test_commit_badge_is_shortened() {
        let sha = "3f2a9c1d4e5b6a7980123456789abcdef0123456";
        let context = RefContext::new("acme", "widgets", sha, SourceType::Commit);
        let (href, class, text) = parse(&render_badge(&context).unwrap());

        assert_eq!(href, format!("https://github.com/acme/widgets/commit/{}", sha));
        assert!(class.contains("bg-blue-500 hover:bg-blue-400"));
        assert_eq!(text, "3f2a9c1");
    }

    #[test]
    fn test_link_encodes_special_characters_in_ref() {
        let context = RefContext::new("acme", "widgets", "fix #12 ?now", SourceType::Branch);
        assert_eq!(
            context.github_ref_path,
            "https://github.com/acme/widgets/tree/fix%20%2312%20%3Fnow"
        );

        let parsed = Url::parse(&context.github_ref_path).unwrap();
        assert_eq!(parsed.fragment(), None);
        assert_eq!(parsed.query(), None);

        let (href, _, text) = parse(&render_badge(&context).unwrap());
        assert_eq!(href, context.github_ref_path);
        assert_eq!(text, "fix #12 ?now");
    }

    #[test]
    fn test_label_is_escaped() {
        let context = RefContext::new("acme", "widgets", "<b>x</b>", SourceType::Branch);
        let html = render_badge(&context).unwrap();

        assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
        let (_, _, text) = parse(&html);
        assert_eq!(text, "<b>x</b>");
    }

    #[test]
    fn test_badge_follows_context_updates() {
        let (sender, receiver) = watch::channel(RefContext {
            git_ref: None,
            github_ref_path: String::new(),
            source: SourceType::Branch,
        });
        let badge = RefBadge::new(receiver);
        assert_eq!(badge.render(), None);

        sender
            .send(RefContext::new("acme", "widgets", "main", SourceType::Branch))
            .unwrap();

        let (_, _, text) = parse(&badge.render().unwrap());
        assert_eq!(text, "main");
    }

    #[test]
    fn test_source_type_uses_site_names() {
        assert_eq!(serde_json::to_string(&SourceType::PullRequest).unwrap(), "\"PR\"");
        assert_eq!(serde_json::to_string(&SourceType::Commit).unwrap(), "\"commit\"");
    }
}
