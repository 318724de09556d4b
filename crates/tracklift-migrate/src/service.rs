//! Capability traits for the two services taking part in a migration.

use crate::error::Result;
use crate::types::{
    CreatedIssue, CreatedMilestone, Issue, Label, Milestone, MilestoneEdit, NewIssue, Note,
    Project, RepoRef, Repository,
};
use async_trait::async_trait;

/// Read access to the service issues are migrated from.
#[async_trait]
pub trait SourceService: Send + Sync {
    /// Lists projects visible to the caller.
    async fn list_projects(&self) -> Result<Vec<Project>>;

    /// Lists a project's milestones.
    async fn list_milestones(&self, project: u64) -> Result<Vec<Milestone>>;

    /// Lists a project's issues, oldest first.
    async fn list_issues(&self, project: u64) -> Result<Vec<Issue>>;

    /// Lists the notes on one issue, oldest first.
    async fn list_notes(&self, project: u64, issue_iid: u64) -> Result<Vec<Note>>;

    /// Lists a project's labels.
    async fn list_labels(&self, project: u64) -> Result<Vec<Label>>;
}

/// Read and write access to the service issues are migrated to.
#[async_trait]
pub trait DestinationService: Send + Sync {
    /// Lists repositories owned by the caller.
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    /// Lists a repository's labels.
    async fn list_labels(&self, repo: &RepoRef) -> Result<Vec<Label>>;

    /// Creates a label.
    async fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<Label>;

    /// Creates an open milestone.
    async fn create_milestone(
        &self,
        repo: &RepoRef,
        title: &str,
        description: &str,
    ) -> Result<CreatedMilestone>;

    /// Edits an existing milestone.
    async fn edit_milestone(
        &self,
        repo: &RepoRef,
        id: u64,
        edit: &MilestoneEdit,
    ) -> Result<CreatedMilestone>;

    /// Creates an issue and returns its destination index.
    async fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<CreatedIssue>;

    /// Adds a comment to the issue with the given destination index.
    async fn create_issue_comment(&self, repo: &RepoRef, index: u64, body: &str) -> Result<()>;
}
