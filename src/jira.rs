//! Jira REST client used to resolve tracking keys.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::error::{ReleaseError, Result};
use crate::release::{Tracker, TrackerRecord};

pub struct JiraClient {
    http: Client,
    base: Url,
    user: String,
    token: String,
}

#[derive(Deserialize)]
struct JiraIssue {
    key: String,
    fields: JiraFields,
}

#[derive(Deserialize)]
struct JiraFields {
    summary: String,
    issuetype: Named,
    status: Named,
    parent: Option<JiraParent>,
}

#[derive(Deserialize)]
struct JiraParent {
    key: String,
    fields: JiraParentFields,
}

#[derive(Deserialize)]
struct JiraParentFields {
    summary: String,
    issuetype: Named,
    status: Named,
}

#[derive(Deserialize)]
struct Named {
    name: String,
}

impl JiraClient {
    pub fn new(url: &str, user: String, token: String) -> Result<Self> {
        let normalized = if url.ends_with('/') {
            url.to_string()
        } else {
            format!("{url}/")
        };
        let base = Url::parse(&normalized).map_err(|_| ReleaseError::InvalidUrl(url.to_string()))?;

        Ok(Self {
            http: Client::new(),
            base,
            user,
            token,
        })
    }

    /// Browser URL of an issue.
    pub fn issue_url(&self, key: &str) -> String {
        self.join(&format!("browse/{key}"))
    }

    fn join(&self, path: &str) -> String {
        self.base
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{path}", self.base))
    }

    async fn get_issue(&self, key: &str) -> Result<JiraIssue> {
        let endpoint = self.join(&format!("rest/api/3/issue/{key}"));
        debug!(%endpoint, "Jira request");

        let response = self
            .http
            .get(&endpoint)
            .basic_auth(&self.user, Some(&self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReleaseError::TrackingIssueNotFound(key.to_string()));
        }

        if !response.status().is_success() {
            return Err(ReleaseError::ApiError {
                status: response.status().as_u16(),
                message: response
                    .text()
                    .await
                    .unwrap_or_else(|_| "<failed to read response body>".to_string()),
            });
        }

        Ok(response.json().await?)
    }

    fn to_record(&self, issue: JiraIssue) -> TrackerRecord {
        let parent = issue.fields.parent.map(|parent| {
            Box::new(TrackerRecord {
                url: self.issue_url(&parent.key),
                key: parent.key,
                type_name: parent.fields.issuetype.name,
                status_name: parent.fields.status.name,
                title: parent.fields.summary,
                parent: None,
            })
        });

        TrackerRecord {
            url: self.issue_url(&issue.key),
            key: issue.key,
            type_name: issue.fields.issuetype.name,
            status_name: issue.fields.status.name,
            title: issue.fields.summary,
            parent,
        }
    }
}

#[async_trait]
impl Tracker for JiraClient {
    async fn issue(&self, key: &str) -> Result<TrackerRecord> {
        let issue = self.get_issue(key).await?;
        Ok(self.to_record(issue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> JiraClient {
        JiraClient::new(&server.uri(), "me@example.com".to_string(), "token".to_string()).unwrap()
    }

    #[test]
    fn test_issue_url() {
        let jira = JiraClient::new("https://example.atlassian.net", String::new(), String::new()).unwrap();
        assert_eq!(jira.issue_url("SIG-1"), "https://example.atlassian.net/browse/SIG-1");

        let jira = JiraClient::new("https://example.atlassian.net/", String::new(), String::new()).unwrap();
        assert_eq!(jira.issue_url("SIG-1"), "https://example.atlassian.net/browse/SIG-1");
    }

    #[test]
    fn test_invalid_url() {
        assert!(matches!(
            JiraClient::new("not a url", String::new(), String::new()),
            Err(ReleaseError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_issue_with_parent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/3/issue/SIG-2"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "key": "SIG-2",
                "fields": {
                    "summary": "Click the button",
                    "issuetype": { "name": "Sub-task" },
                    "status": { "name": "Review" },
                    "parent": {
                        "key": "SIG-1",
                        "fields": {
                            "summary": "[TEST] Login flow",
                            "issuetype": { "name": "Story" },
                            "status": { "name": "Done" }
                        }
                    }
                }
            })))
            .mount(&server)
            .await;

        let jira = client(&server);
        let record = jira.issue("SIG-2").await.unwrap();

        assert_eq!(record.key, "SIG-2");
        assert_eq!(record.type_name, "Sub-task");
        assert_eq!(record.url, format!("{}/browse/SIG-2", server.uri()));
        let parent = record.parent.unwrap();
        assert_eq!(parent.key, "SIG-1");
        assert_eq!(parent.title, "[TEST] Login flow");
    }

    #[tokio::test]
    async fn test_issue_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "errorMessages": ["Issue does not exist or you do not have permission to see it."]
            })))
            .mount(&server)
            .await;

        let result = client(&server).issue("SIG-404").await;
        assert!(matches!(result, Err(ReleaseError::TrackingIssueNotFound(key)) if key == "SIG-404"));
    }
}
