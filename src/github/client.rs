// src/github/client.rs
// =============================================================================
// A small GraphQL client for the GitHub API.
//
// Every query in this crate goes through GraphQlClient::execute, which:
// 1. POSTs {"query": ..., "variables": ...} to the endpoint
// 2. Checks the HTTP status
// 3. Fails if the response carries a GraphQL "errors" array
// 4. Deserializes the "data" field into the caller's response type
//
// Rust concepts:
// - Generics with trait bounds: execute<T: DeserializeOwned>
// - serde: Describing JSON request/response shapes with structs
// =============================================================================

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::{Config, DocsLayout};
use crate::error::{Error, Result};

// Body of every GraphQL request
#[derive(Debug, Serialize)]
struct QueryBody<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

// Envelope of every GraphQL response
//
// `data` is kept as raw JSON until we know there were no errors, so a
// partial `data` next to an error never reaches the caller.
#[derive(Debug, Deserialize)]
struct ResponseBody {
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    message: String,
}

/// Executes GraphQL queries against one endpoint.
///
/// Cheap to clone: the underlying reqwest client is reference counted.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: Client,
    endpoint: Url,
    token: Option<String>,
    layout: DocsLayout,
}

impl GraphQlClient {
    // Creates a client from runtime configuration
    //
    // Fails only if the TLS backend cannot be initialised
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            token: config.token.clone(),
            layout: config.layout.clone(),
        })
    }

    /// Documentation layout the query operations should use.
    pub fn layout(&self) -> &DocsLayout {
        &self.layout
    }

    /// Runs `query` with `variables` and deserializes the `data` field.
    pub async fn execute<V, T>(&self, query: &str, variables: V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(self.endpoint.clone())
            .json(&QueryBody { query, variables });

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "GraphQL response received");

        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let body: ResponseBody = response.json().await?;

        if !body.errors.is_empty() {
            return Err(Error::GraphQl(
                body.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        let data = body.data.ok_or(Error::MissingData)?;
        Ok(serde_json::from_value(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Debug, Deserialize)]
    struct Viewer {
        viewer: Login,
    }

    #[derive(Debug, Deserialize)]
    struct Login {
        login: String,
    }

    const VIEWER_QUERY: &str = "query { viewer { login } }";

    #[tokio::test]
    async fn test_execute_returns_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "variables": { "owner": "acme" } })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "viewer": { "login": "octocat" } } })),
            )
            .mount(&server)
            .await;

        let client = GraphQlClient::new(&Config::for_endpoint(&server.uri())).unwrap();
        let viewer: Viewer = client
            .execute(VIEWER_QUERY, json!({ "owner": "acme" }))
            .await
            .unwrap();

        assert_eq!(viewer.viewer.login, "octocat");
    }

    #[tokio::test]
    async fn test_execute_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": { "viewer": { "login": "octocat" } } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut config = Config::for_endpoint(&server.uri());
        config.token = Some("secret".to_string());
        let client = GraphQlClient::new(&config).unwrap();

        let result: Result<Viewer> = client.execute(VIEWER_QUERY, json!({})).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_surfaces_graphql_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "viewer": null },
                "errors": [{ "message": "Could not resolve to a Repository" }]
            })))
            .mount(&server)
            .await;

        let client = GraphQlClient::new(&Config::for_endpoint(&server.uri())).unwrap();
        let result: Result<Viewer> = client.execute(VIEWER_QUERY, json!({})).await;

        match result {
            Err(Error::GraphQl(messages)) => {
                assert_eq!(messages, vec!["Could not resolve to a Repository".to_string()]);
            }
            other => panic!("expected GraphQl error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_surfaces_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = GraphQlClient::new(&Config::for_endpoint(&server.uri())).unwrap();
        let result: Result<Viewer> = client.execute(VIEWER_QUERY, json!({})).await;

        assert!(matches!(result, Err(Error::Status(401))));
    }

    #[tokio::test]
    async fn test_execute_without_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = GraphQlClient::new(&Config::for_endpoint(&server.uri())).unwrap();
        let result: Result<Viewer> = client.execute(VIEWER_QUERY, json!({})).await;

        assert!(matches!(result, Err(Error::MissingData)));
    }
}
