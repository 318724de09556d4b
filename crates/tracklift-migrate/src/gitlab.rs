//! GitLab v4 REST client, the migration source.

use crate::error::{MigrationError, Result};
use crate::service::SourceService;
use crate::types::{Issue, ItemState, Label, Milestone, Note, Project};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// Items requested per page.
const PAGE_SIZE: usize = 100;

/// GitLab API response types
#[derive(Debug, Deserialize)]
struct GitLabProject {
    id: u64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct GitLabMilestone {
    id: u64,
    title: String,
    description: Option<String>,
    state: String,
}

#[derive(Debug, Deserialize)]
struct GitLabIssue {
    id: u64,
    iid: u64,
    title: String,
    description: Option<String>,
    state: String,
    #[serde(default)]
    labels: Vec<String>,
    author: GitLabUser,
    milestone: Option<GitLabMilestoneRef>,
}

#[derive(Debug, Deserialize)]
struct GitLabMilestoneRef {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct GitLabUser {
    username: String,
}

#[derive(Debug, Deserialize)]
struct GitLabLabel {
    id: u64,
    name: String,
    color: String,
}

#[derive(Debug, Deserialize)]
struct GitLabNote {
    id: u64,
    body: String,
}

/// GitLab reports `active`/`opened` for open items.
fn parse_state(state: &str) -> ItemState {
    if state == "closed" {
        ItemState::Closed
    } else {
        ItemState::Open
    }
}

impl From<GitLabProject> for Project {
    fn from(p: GitLabProject) -> Self {
        Self {
            id: p.id,
            name: p.name,
        }
    }
}

impl From<GitLabMilestone> for Milestone {
    fn from(m: GitLabMilestone) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description.unwrap_or_default(),
            state: parse_state(&m.state),
        }
    }
}

impl From<GitLabIssue> for Issue {
    fn from(i: GitLabIssue) -> Self {
        Self {
            id: i.id,
            iid: i.iid,
            title: i.title,
            body: i.description.unwrap_or_default(),
            author: i.author.username,
            milestone_id: i.milestone.map(|m| m.id),
            labels: i.labels,
            state: parse_state(&i.state),
        }
    }
}

impl From<GitLabLabel> for Label {
    fn from(l: GitLabLabel) -> Self {
        Self {
            id: l.id,
            name: l.name,
            color: l.color,
        }
    }
}

impl From<GitLabNote> for Note {
    fn from(n: GitLabNote) -> Self {
        Self {
            id: n.id,
            body: n.body,
        }
    }
}

/// Client for the GitLab API.
pub struct GitLabClient {
    client: Client,
    base_url: String,
    token: String,
}

impl GitLabClient {
    /// Create a new GitLab client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitLab instance URL (e.g., "https://gitlab.com")
    /// * `token` - GitLab personal access token
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

    async fn get<T: DeserializeOwned + Send>(&self, path: &str) -> Result<T> {
        let url = format!("{}/api/v4{path}", self.base_url);
        debug!(%url, "GitLab GET");

        let response = self
            .client
            .get(&url)
            .header("PRIVATE-TOKEN", &self.token)
            .send()
            .await
            .map_err(|e| MigrationError::NetworkError(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(MigrationError::NotFound(path.to_string())),
            StatusCode::UNAUTHORIZED => {
                return Err(MigrationError::AuthenticationFailed(
                    "Invalid GitLab token".to_string(),
                ))
            }
            status if !status.is_success() => {
                let body = response.text().await.unwrap_or_default();
                return Err(MigrationError::ApiError(format!(
                    "GitLab API error ({status}): {body}"
                )));
            }
            _ => {}
        }

        response
            .json()
            .await
            .map_err(|e| MigrationError::ApiError(e.to_string()))
    }

    async fn get_paginated<T: DeserializeOwned + Send>(&self, path: &str) -> Result<Vec<T>> {
        let mut all_items = Vec::new();
        let mut page = 1;

        loop {
            let separator = if path.contains('?') { '&' } else { '?' };
            let paginated_path = format!("{path}{separator}page={page}&per_page={PAGE_SIZE}");

            let items: Vec<T> = self.get(&paginated_path).await?;
            let count = items.len();
            all_items.extend(items);

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(all_items)
    }
}

#[async_trait]
impl SourceService for GitLabClient {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        let projects: Vec<GitLabProject> = self.get_paginated("/projects?membership=true").await?;
        Ok(projects.into_iter().map(Project::from).collect())
    }

    async fn list_milestones(&self, project: u64) -> Result<Vec<Milestone>> {
        let milestones: Vec<GitLabMilestone> = self
            .get_paginated(&format!("/projects/{project}/milestones"))
            .await?;
        Ok(milestones.into_iter().map(Milestone::from).collect())
    }

    async fn list_issues(&self, project: u64) -> Result<Vec<Issue>> {
        let issues: Vec<GitLabIssue> = self
            .get_paginated(&format!(
                "/projects/{project}/issues?scope=all&order_by=created_at&sort=asc"
            ))
            .await?;
        Ok(issues.into_iter().map(Issue::from).collect())
    }

    async fn list_notes(&self, project: u64, issue_iid: u64) -> Result<Vec<Note>> {
        let notes: Vec<GitLabNote> = self
            .get_paginated(&format!(
                "/projects/{project}/issues/{issue_iid}/notes?order_by=created_at&sort=asc"
            ))
            .await?;
        Ok(notes.into_iter().map(Note::from).collect())
    }

    async fn list_labels(&self, project: u64) -> Result<Vec<Label>> {
        let labels: Vec<GitLabLabel> = self
            .get_paginated(&format!("/projects/{project}/labels"))
            .await?;
        Ok(labels.into_iter().map(Label::from).collect())
    }
}
