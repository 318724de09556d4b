//! Gogs v1 REST client, the migration destination.

use crate::error::{MigrationError, Result};
use crate::service::DestinationService;
use crate::types::{
    CreatedIssue, CreatedMilestone, ItemState, Label, MilestoneEdit, NewIssue, RepoRef,
    Repository,
};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct GogsRepository {
    id: u64,
    name: String,
    owner: GogsUser,
}

#[derive(Debug, Deserialize)]
struct GogsUser {
    #[serde(alias = "login")]
    username: String,
}

#[derive(Debug, Deserialize)]
struct GogsLabel {
    id: u64,
    name: String,
    color: String,
}

#[derive(Debug, Deserialize)]
struct GogsMilestone {
    id: u64,
    title: String,
}

#[derive(Debug, Deserialize)]
struct GogsIssue {
    id: u64,
    number: u64,
}

#[derive(Debug, Serialize)]
struct CreateLabelRequest<'a> {
    name: &'a str,
    color: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateMilestoneRequest<'a> {
    title: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
struct EditMilestoneRequest<'a> {
    title: &'a str,
    description: &'a str,
    state: &'static str,
}

#[derive(Debug, Serialize)]
struct CreateIssueRequest<'a> {
    title: &'a str,
    body: &'a str,
    assignee: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    milestone: Option<u64>,
    labels: &'a [u64],
    closed: bool,
}

#[derive(Debug, Serialize)]
struct CreateCommentRequest<'a> {
    body: &'a str,
}

impl From<GogsLabel> for Label {
    fn from(l: GogsLabel) -> Self {
        Self {
            id: l.id,
            name: l.name,
            color: l.color,
        }
    }
}

impl From<GogsMilestone> for CreatedMilestone {
    fn from(m: GogsMilestone) -> Self {
        Self { id: m.id }
    }
}

/// Client for the Gogs API.
pub struct GogsClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GogsClient {
    /// Create a new Gogs client.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent("tracklift")
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| MigrationError::NetworkError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    fn repo_path(repo: &RepoRef, rest: &str) -> String {
        format!("/repos/{}/{}{rest}", repo.owner, repo.name)
    }

    async fn send<T: DeserializeOwned + Send>(
        &self,
        request: RequestBuilder,
        path: &str,
    ) -> Result<T> {
        let response = request
            .header("Authorization", format!("token {}", self.token))
            .send()
            .await
            .map_err(|e| MigrationError::NetworkError(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(MigrationError::NotFound(path.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(MigrationError::AuthenticationFailed(
                    "Invalid Gogs token".to_string(),
                ))
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(MigrationError::ApiError(format!(
                    "Request failed with status {status}: {body}"
                )));
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| MigrationError::ApiError(e.to_string()))
    }

    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T> {
        debug!(%path, "Gogs GET");
        self.send(self.client.get(self.url(path)), path).await
    }

    async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync,
    {
        debug!(%path, "Gogs POST");
        self.send(self.client.post(self.url(path)).json(body), path)
            .await
    }

    async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned + Send,
        B: Serialize + Sync,
    {
        debug!(%path, "Gogs PATCH");
        self.send(self.client.patch(self.url(path)).json(body), path)
            .await
    }
}

#[async_trait]
impl DestinationService for GogsClient {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let repos: Vec<GogsRepository> = self.get("/user/repos").await?;
        Ok(repos
            .into_iter()
            .map(|r| Repository {
                id: r.id,
                name: r.name,
                owner: r.owner.username,
            })
            .collect())
    }

    async fn list_labels(&self, repo: &RepoRef) -> Result<Vec<Label>> {
        let labels: Vec<GogsLabel> = self.get(&Self::repo_path(repo, "/labels")).await?;
        Ok(labels.into_iter().map(Label::from).collect())
    }

    async fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<Label> {
        let label: GogsLabel = self
            .post(
                &Self::repo_path(repo, "/labels"),
                &CreateLabelRequest { name, color },
            )
            .await?;
        Ok(label.into())
    }

    async fn create_milestone(
        &self,
        repo: &RepoRef,
        title: &str,
        description: &str,
    ) -> Result<CreatedMilestone> {
        let milestone: GogsMilestone = self
            .post(
                &Self::repo_path(repo, "/milestones"),
                &CreateMilestoneRequest { title, description },
            )
            .await?;
        Ok(milestone.into())
    }

    async fn edit_milestone(
        &self,
        repo: &RepoRef,
        id: u64,
        edit: &MilestoneEdit,
    ) -> Result<CreatedMilestone> {
        let state = match edit.state {
            ItemState::Open => "open",
            ItemState::Closed => "closed",
        };
        let milestone: GogsMilestone = self
            .patch(
                &Self::repo_path(repo, &format!("/milestones/{id}")),
                &EditMilestoneRequest {
                    title: &edit.title,
                    description: &edit.description,
                    state,
                },
            )
            .await?;
        Ok(milestone.into())
    }

    async fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<CreatedIssue> {
        let created: GogsIssue = self
            .post(
                &Self::repo_path(repo, "/issues"),
                &CreateIssueRequest {
                    title: &issue.title,
                    body: &issue.body,
                    assignee: &issue.assignee,
                    milestone: issue.milestone,
                    labels: &issue.labels,
                    closed: issue.closed,
                },
            )
            .await?;
        Ok(CreatedIssue {
            id: created.id,
            index: created.number,
        })
    }

    async fn create_issue_comment(&self, repo: &RepoRef, index: u64, body: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                &Self::repo_path(repo, &format!("/issues/{index}/comments")),
                &CreateCommentRequest { body },
            )
            .await?;
        Ok(())
    }
}
