//! Release-related queries and mutations against the GitHub GraphQL API.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::client::GitHubClient;
use crate::error::{ReleaseError, Result};
use crate::release::Hosting;
use crate::types::{PublishedRelease, PullRequestRecord, ReleaseSummary};

const LAST_RELEASES_QUERY: &str = r#"
query GitHubLastReleases($owner: String!, $repository: String!, $first: Int!) {
    repository(owner: $owner, name: $repository) {
        id
        releases(orderBy: {field: CREATED_AT, direction: DESC}, first: $first) {
            nodes {
                id
                name
                description
                version: tagName
                url
                publishedAt
                isDraft
                isPrerelease
            }
        }
    }
}
"#;

const PULL_REQUESTS_QUERY: &str = r#"
query GitHubPullRequests(
    $owner: String!
    $repository: String!
    $base: String!
    $states: [PullRequestState!]
    $last: Int!
) {
    repository(owner: $owner, name: $repository) {
        id
        pullRequests(baseRefName: $base, states: $states, last: $last) {
            nodes {
                pullRequestId: id
                number
                title
                headRefName
                url
                createdAt
                updatedAt
                isDraft
                state
                description: body
            }
        }
    }
}
"#;

const PULL_REQUEST_BY_HEAD_QUERY: &str = r#"
query GitHubSearchPullRequestByHeadRefName(
    $owner: String!
    $repository: String!
    $headRefName: String!
) {
    repository(owner: $owner, name: $repository) {
        id
        pullRequests(headRefName: $headRefName, first: 1) {
            nodes {
                pullRequestId: id
                number
                title
                headRefName
                url
                createdAt
                updatedAt
                isDraft
                state
                description: body
            }
        }
    }
}
"#;

const RELEASE_PULL_REQUESTS_QUERY: &str = r#"
query GitHubPullRequestIssues($owner: String!, $repository: String!, $number: Int!, $first: Int!) {
    repository(owner: $owner, name: $repository) {
        pullRequest(number: $number) {
            commits(first: $first) {
                nodes {
                    commit {
                        associatedPullRequests(first: 1) {
                            nodes {
                                pullRequestId: id
                                number
                                title
                                headRefName
                                url
                                createdAt
                                updatedAt
                                isDraft
                                state
                                description: body
                                author {
                                    login
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
"#;

const REF_LAST_COMMIT_QUERY: &str = r#"
query GitRefLastCommitOid($owner: String!, $repository: String!, $qualifiedName: String!) {
    repository(owner: $owner, name: $repository) {
        ref(qualifiedName: $qualifiedName) {
            target {
                ... on Commit {
                    oid
                }
            }
        }
    }
}
"#;

const CREATE_BRANCH_MUTATION: &str = r#"
mutation GitHubCreateBranch($input: CreateRefInput!) {
    createRef(input: $input) {
        ref {
            id
            name
        }
    }
}
"#;

const CREATE_PULL_REQUEST_MUTATION: &str = r#"
mutation GitHubCreatePullRequest($input: CreatePullRequestInput!) {
    createPullRequest(input: $input) {
        pullRequest {
            number
            url
        }
    }
}
"#;

const UPDATE_PULL_REQUEST_BODY_MUTATION: &str = r#"
mutation GitHubUpdatePullRequestBody($pullRequestId: ID!, $body: String!) {
    updatePullRequest(input: {pullRequestId: $pullRequestId, body: $body}) {
        pullRequest {
            number
        }
    }
}
"#;

#[derive(Deserialize)]
struct Nodes<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct RepositoryResponse<T> {
    repository: T,
}

#[derive(Deserialize)]
struct ReleasesRepository {
    id: String,
    releases: Nodes<PublishedRelease>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestsRepository {
    id: String,
    pull_requests: Nodes<ReleaseSummary>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReleasePullRequestRepository {
    pull_request: Option<CommitsPullRequest>,
}

#[derive(Deserialize)]
struct CommitsPullRequest {
    commits: Nodes<CommitNode>,
}

#[derive(Deserialize)]
struct CommitNode {
    commit: Commit,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Commit {
    associated_pull_requests: Nodes<PullRequestRecord>,
}

#[derive(Deserialize)]
struct RefRepository {
    #[serde(rename = "ref")]
    git_ref: Option<GitRef>,
}

#[derive(Deserialize)]
struct GitRef {
    target: CommitTarget,
}

#[derive(Deserialize)]
struct CommitTarget {
    oid: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateRefResponse {
    create_ref: CreateRefResult,
}

#[derive(Deserialize)]
struct CreateRefResult {
    #[serde(rename = "ref")]
    git_ref: CreatedRef,
}

#[derive(Deserialize, Debug)]
pub struct CreatedRef {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePullRequestResponse {
    create_pull_request: PullRequestPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdatePullRequestResponse {
    update_pull_request: PullRequestPayload,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestPayload {
    pull_request: CreatedPullRequest,
}

#[derive(Deserialize, Debug)]
pub struct CreatedPullRequest {
    pub number: u64,
    #[serde(default)]
    pub url: String,
}

impl GitHubClient {
    /// The newest `limit` releases, newest first.
    pub async fn last_releases(&self, limit: u32) -> Result<Vec<PublishedRelease>> {
        let response: RepositoryResponse<ReleasesRepository> = self
            .query(LAST_RELEASES_QUERY, json!({ "first": limit }))
            .await?;

        let repository_id = response.repository.id;
        Ok(response
            .repository
            .releases
            .nodes
            .into_iter()
            .map(|mut release| {
                release.repository_id = repository_id.clone();
                release
            })
            .collect())
    }

    pub async fn latest_release(&self) -> Result<PublishedRelease> {
        self.last_releases(1)
            .await?
            .into_iter()
            .next()
            .ok_or(ReleaseError::NoReleases)
    }

    /// Open pull requests into `base`; more than one is ambiguous.
    pub async fn pending_releases(&self, base: &str, limit: u32) -> Result<Vec<ReleaseSummary>> {
        self.pull_requests(base, "OPEN", limit).await
    }

    async fn pull_requests(&self, base: &str, state: &str, limit: u32) -> Result<Vec<ReleaseSummary>> {
        let response: RepositoryResponse<PullRequestsRepository> = self
            .query(
                PULL_REQUESTS_QUERY,
                json!({ "base": base, "states": [state], "last": limit }),
            )
            .await?;

        let repository_id = response.repository.id;
        let summaries: Vec<ReleaseSummary> = response
            .repository
            .pull_requests
            .nodes
            .into_iter()
            .map(|summary| with_repository(summary, &repository_id))
            .collect();

        debug!(base, state, count = summaries.len(), "Fetched pull requests");
        Ok(summaries)
    }

    /// The pull request of the `release/<version>` branch.
    pub async fn release_by_version(&self, version: &str) -> Result<ReleaseSummary> {
        let head_ref_name = format!("release/{version}");
        let response: RepositoryResponse<PullRequestsRepository> = self
            .query(
                PULL_REQUEST_BY_HEAD_QUERY,
                json!({ "headRefName": head_ref_name }),
            )
            .await?;

        let repository_id = response.repository.id;
        response
            .repository
            .pull_requests
            .nodes
            .into_iter()
            .next()
            .map(|summary| with_repository(summary, &repository_id))
            .ok_or_else(|| ReleaseError::ReleaseNotFound(version.to_string()))
    }

    pub async fn last_commit_oid(&self, qualified_name: &str) -> Result<String> {
        let response: RepositoryResponse<RefRepository> = self
            .query(
                REF_LAST_COMMIT_QUERY,
                json!({ "qualifiedName": qualified_name }),
            )
            .await?;

        response
            .repository
            .git_ref
            .map(|r| r.target.oid)
            .ok_or_else(|| ReleaseError::ReleaseNotFound(qualified_name.to_string()))
    }

    pub async fn create_branch(&self, repository_id: &str, name: &str, oid: &str) -> Result<CreatedRef> {
        info!(name, oid, "Creating branch");
        let response: CreateRefResponse = self
            .mutation(
                CREATE_BRANCH_MUTATION,
                json!({ "input": { "repositoryId": repository_id, "name": name, "oid": oid } }),
            )
            .await?;
        Ok(response.create_ref.git_ref)
    }

    pub async fn create_pull_request(
        &self,
        title: &str,
        repository_id: &str,
        base: &str,
        head: &str,
    ) -> Result<CreatedPullRequest> {
        info!(title, base, head, "Creating pull request");
        let response: CreatePullRequestResponse = self
            .mutation(
                CREATE_PULL_REQUEST_MUTATION,
                json!({
                    "input": {
                        "title": title,
                        "repositoryId": repository_id,
                        "baseRefName": base,
                        "headRefName": head,
                    }
                }),
            )
            .await?;
        Ok(response.create_pull_request.pull_request)
    }

    pub async fn update_description(&self, pull_request_id: &str, body: &str) -> Result<u64> {
        info!(pull_request_id, "Updating pull request description");
        let response: UpdatePullRequestResponse = self
            .mutation(
                UPDATE_PULL_REQUEST_BODY_MUTATION,
                json!({ "pullRequestId": pull_request_id, "body": body }),
            )
            .await?;
        Ok(response.update_pull_request.pull_request.number)
    }
}

fn with_repository(mut summary: ReleaseSummary, repository_id: &str) -> ReleaseSummary {
    summary.repository_id = Some(repository_id.to_string());
    summary
}

#[async_trait]
impl Hosting for GitHubClient {
    /// One pull request per commit of the release: the first one GitHub
    /// associates with it. Commits without a pull request are ignored.
    async fn release_pull_requests(
        &self,
        release_number: u64,
        limit: u32,
    ) -> Result<Vec<PullRequestRecord>> {
        let response: RepositoryResponse<ReleasePullRequestRepository> = self
            .query(
                RELEASE_PULL_REQUESTS_QUERY,
                json!({ "number": release_number, "first": limit }),
            )
            .await?;

        let pull_request = response
            .repository
            .pull_request
            .ok_or(ReleaseError::PullRequestNotFound(release_number))?;

        Ok(pull_request
            .commits
            .nodes
            .into_iter()
            .filter_map(|node| node.commit.associated_pull_requests.nodes.into_iter().next())
            .collect())
    }
}
