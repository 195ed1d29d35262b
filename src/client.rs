use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{ReleaseError, Result};

const API_ENDPOINT: &str = "https://api.github.com/graphql";
const USER_AGENT: &str = concat!("siali/", env!("CARGO_PKG_VERSION"));

/// GraphQL executor bound to one repository. `owner` and `repository`
/// are merged into the variables of every request.
pub struct GitHubClient {
    http: Client,
    endpoint: String,
    token: String,
    owner: String,
    repository: String,
}

#[derive(Serialize)]
struct GraphQLRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Deserialize, Debug)]
struct GraphQLError {
    message: String,
}

impl GitHubClient {
    /// Create a client for a repository slug of the form `owner/name`.
    pub fn new(slug: &str, token: String) -> Result<Self> {
        let (owner, repository) = parse_slug(slug)?;
        Ok(Self {
            http: Client::new(),
            endpoint: API_ENDPOINT.to_string(),
            token,
            owner,
            repository,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let mut merged = json!({
            "owner": self.owner,
            "repository": self.repository,
        });
        if let (Some(target), Value::Object(extra)) = (merged.as_object_mut(), variables) {
            target.extend(extra);
        }

        debug!(endpoint = %self.endpoint, "GraphQL request");

        let request = GraphQLRequest {
            query,
            variables: merged,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("token {}", self.token))
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ReleaseError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        let gql_response: GraphQLResponse<T> = response.json().await?;

        if let Some(errors) = gql_response.errors {
            return Err(ReleaseError::GraphQL {
                messages: errors.into_iter().map(|e| e.message).collect(),
            });
        }

        gql_response.data.ok_or(ReleaseError::EmptyResponse)
    }

    /// Mutations go through the same endpoint; kept separate for readability at call sites.
    pub async fn mutation<T: DeserializeOwned>(&self, mutation: &str, variables: Value) -> Result<T> {
        self.query(mutation, variables).await
    }
}

fn parse_slug(slug: &str) -> Result<(String, String)> {
    match slug.trim().split_once('/') {
        Some((owner, repository))
            if !owner.is_empty() && !repository.is_empty() && !repository.contains('/') =>
        {
            Ok((owner.to_string(), repository.to_string()))
        }
        _ => Err(ReleaseError::InvalidRepository(slug.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Deserialize, Debug)]
    struct Viewer {
        login: String,
    }

    #[test]
    fn test_parse_slug() {
        assert_eq!(
            parse_slug("Amsterdam/signals-frontend").unwrap(),
            ("Amsterdam".to_string(), "signals-frontend".to_string())
        );
        assert!(parse_slug("signals-frontend").is_err());
        assert!(parse_slug("a/b/c").is_err());
        assert!(parse_slug("/b").is_err());
    }

    #[tokio::test]
    async fn test_query_merges_repository_variables() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("Authorization", "token secret"))
            .and(body_partial_json(json!({
                "variables": { "owner": "acme", "repository": "app", "number": 7 }
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "login": "octocat" } })),
            )
            .mount(&server)
            .await;

        let client = GitHubClient::new("acme/app", "secret".to_string())
            .unwrap()
            .with_endpoint(server.uri());
        let viewer: Viewer = client.query("query", json!({ "number": 7 })).await.unwrap();
        assert_eq!(viewer.login, "octocat");
    }

    #[tokio::test]
    async fn test_query_graphql_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "message": "Bad credentials" }]
            })))
            .mount(&server)
            .await;

        let client = GitHubClient::new("acme/app", "secret".to_string())
            .unwrap()
            .with_endpoint(server.uri());
        let result = client.query::<Viewer>("query", json!({})).await;
        assert!(matches!(result, Err(ReleaseError::GraphQL { messages }) if messages == vec!["Bad credentials"]));
    }

    #[tokio::test]
    async fn test_query_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = GitHubClient::new("acme/app", "secret".to_string())
            .unwrap()
            .with_endpoint(server.uri());
        let result = client.query::<Viewer>("query", json!({})).await;
        assert!(matches!(result, Err(ReleaseError::ApiError { status: 502, .. })));
    }
}
