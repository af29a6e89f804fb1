// src/error.rs
// =============================================================================
// Error types for the GitHub GraphQL layer.
//
// The query operations (paths, pull requests, contents) never hand these
// errors to their callers: each one turns a failure into its own "nothing
// found" value. The errors exist so that the client can say precisely what
// went wrong, and so the operations can log it.
//
// Rust concepts:
// - thiserror: Derives std::error::Error and Display from attributes
// - #[from]: Generates From impls so the ? operator converts errors for us
// =============================================================================

use thiserror::Error;

/// Everything that can go wrong while talking to the GraphQL endpoint.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never produced a response (DNS, TLS, timeout, ...).
    #[error("GraphQL request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status.
    #[error("GraphQL endpoint returned HTTP {0}")]
    Status(u16),

    /// The endpoint answered, but reported query errors.
    ///
    /// GitHub reports a missing repository this way, alongside a null
    /// `repository` field.
    #[error("GraphQL query returned errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response had neither errors nor a `data` field.
    #[error("GraphQL response contained no data")]
    MissingData,

    /// The `data` field did not match the shape we asked for.
    #[error("Failed to deserialize GraphQL response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// A repository string that is neither `owner/name` nor a GitHub URL.
    #[error("Invalid repository '{0}', expected owner/name or a GitHub URL")]
    InvalidRepository(String),

    /// A pull request identifier that is not a positive integer.
    #[error("Invalid pull request number '{0}'")]
    InvalidPullRequestNumber(String),
}

/// Result alias used throughout the `github` module.
pub type Result<T> = std::result::Result<T, Error>;
