//! In-memory service implementations for testing.
//!
//! [`MemorySource`] serves fixed fixture data and records which listings were
//! requested. [`MemoryDestination`] behaves like a fresh Gogs repository:
//! it hands out sequential IDs and issue indices and records every write.

use crate::error::{MigrationError, Result};
use crate::service::{DestinationService, SourceService};
use crate::types::{
    CreatedIssue, CreatedMilestone, Issue, ItemState, Label, Milestone, MilestoneEdit, NewIssue,
    Note, Project, RepoRef, Repository,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A listing requested from a [`MemorySource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRead {
    Projects,
    Milestones(u64),
    Issues(u64),
    Notes { project: u64, issue_iid: u64 },
    Labels(u64),
}

/// Fixture-backed source service.
#[derive(Default)]
pub struct MemorySource {
    projects: Vec<Project>,
    milestones: Vec<Milestone>,
    issues: Vec<Issue>,
    notes: HashMap<u64, Vec<Note>>,
    labels: Vec<Label>,
    reads: Mutex<Vec<SourceRead>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(mut self, project: Project) -> Self {
        self.projects.push(project);
        self
    }

    pub fn with_milestone(mut self, milestone: Milestone) -> Self {
        self.milestones.push(milestone);
        self
    }

    pub fn with_issue(mut self, issue: Issue) -> Self {
        self.issues.push(issue);
        self
    }

    /// Attaches notes to the issue with the given `iid`.
    pub fn with_notes(mut self, issue_iid: u64, notes: Vec<Note>) -> Self {
        self.notes.entry(issue_iid).or_default().extend(notes);
        self
    }

    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    /// Listings requested so far, in order.
    pub fn reads(&self) -> Vec<SourceRead> {
        self.reads.lock().clone()
    }

    /// Forgets recorded listings.
    pub fn clear_reads(&self) {
        self.reads.lock().clear();
    }

    fn record(&self, read: SourceRead) {
        self.reads.lock().push(read);
    }
}

#[async_trait]
impl SourceService for MemorySource {
    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.record(SourceRead::Projects);
        Ok(self.projects.clone())
    }

    async fn list_milestones(&self, project: u64) -> Result<Vec<Milestone>> {
        self.record(SourceRead::Milestones(project));
        Ok(self.milestones.clone())
    }

    async fn list_issues(&self, project: u64) -> Result<Vec<Issue>> {
        self.record(SourceRead::Issues(project));
        Ok(self.issues.clone())
    }

    async fn list_notes(&self, project: u64, issue_iid: u64) -> Result<Vec<Note>> {
        self.record(SourceRead::Notes { project, issue_iid });
        Ok(self.notes.get(&issue_iid).cloned().unwrap_or_default())
    }

    async fn list_labels(&self, project: u64) -> Result<Vec<Label>> {
        self.record(SourceRead::Labels(project));
        Ok(self.labels.clone())
    }
}

/// A write performed against a [`MemoryDestination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestinationCall {
    CreateLabel {
        name: String,
        color: String,
    },
    CreateMilestone {
        title: String,
        description: String,
    },
    EditMilestone {
        id: u64,
        edit: MilestoneEdit,
    },
    CreateIssue(NewIssue),
    CreateComment {
        index: u64,
        body: String,
    },
}

#[derive(Default)]
struct DestinationState {
    labels: Vec<Label>,
    milestones: Vec<(u64, String, ItemState)>,
    issue_count: u64,
    calls: Vec<DestinationCall>,
    next_id: u64,
}

impl DestinationState {
    fn allocate_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Destination service that keeps everything in memory.
#[derive(Default)]
pub struct MemoryDestination {
    repositories: Vec<Repository>,
    failing_milestone: Option<String>,
    state: Mutex<DestinationState>,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(DestinationState {
                next_id: 100,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repositories.push(repository);
        self
    }

    /// Preloads a label without recording a call.
    pub fn with_label(self, label: Label) -> Self {
        self.state.lock().labels.push(label);
        self
    }

    /// Makes creation of the milestone titled `title` fail.
    pub fn with_failing_milestone(mut self, title: impl Into<String>) -> Self {
        self.failing_milestone = Some(title.into());
        self
    }

    /// Writes performed so far, in order.
    pub fn calls(&self) -> Vec<DestinationCall> {
        self.state.lock().calls.clone()
    }

    /// Labels currently on the destination.
    pub fn labels(&self) -> Vec<Label> {
        self.state.lock().labels.clone()
    }

    /// IDs of milestones currently marked closed.
    pub fn closed_milestones(&self) -> Vec<u64> {
        self.state
            .lock()
            .milestones
            .iter()
            .filter(|(_, _, state)| state.is_closed())
            .map(|(id, _, _)| *id)
            .collect()
    }
}

#[async_trait]
impl DestinationService for MemoryDestination {
    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        Ok(self.repositories.clone())
    }

    async fn list_labels(&self, _repo: &RepoRef) -> Result<Vec<Label>> {
        Ok(self.state.lock().labels.clone())
    }

    async fn create_label(&self, _repo: &RepoRef, name: &str, color: &str) -> Result<Label> {
        let mut state = self.state.lock();
        let label = Label {
            id: state.allocate_id(),
            name: name.to_string(),
            color: color.to_string(),
        };
        state.labels.push(label.clone());
        state.calls.push(DestinationCall::CreateLabel {
            name: name.to_string(),
            color: color.to_string(),
        });
        Ok(label)
    }

    async fn create_milestone(
        &self,
        _repo: &RepoRef,
        title: &str,
        description: &str,
    ) -> Result<CreatedMilestone> {
        if self.failing_milestone.as_deref() == Some(title) {
            return Err(MigrationError::ApiError(format!(
                "Request failed with status 500 Internal Server Error: milestone {title}"
            )));
        }

        let mut state = self.state.lock();
        let id = state.allocate_id();
        state.milestones.push((id, title.to_string(), ItemState::Open));
        state.calls.push(DestinationCall::CreateMilestone {
            title: title.to_string(),
            description: description.to_string(),
        });
        Ok(CreatedMilestone { id })
    }

    async fn edit_milestone(
        &self,
        _repo: &RepoRef,
        id: u64,
        edit: &MilestoneEdit,
    ) -> Result<CreatedMilestone> {
        let mut state = self.state.lock();
        let Some(milestone) = state.milestones.iter_mut().find(|(mid, _, _)| *mid == id) else {
            return Err(MigrationError::NotFound(format!("milestone {id}")));
        };
        milestone.1 = edit.title.clone();
        milestone.2 = edit.state;
        state.calls.push(DestinationCall::EditMilestone {
            id,
            edit: edit.clone(),
        });
        Ok(CreatedMilestone { id })
    }

    async fn create_issue(&self, _repo: &RepoRef, issue: &NewIssue) -> Result<CreatedIssue> {
        let mut state = self.state.lock();
        let id = state.allocate_id();
        state.issue_count += 1;
        let index = state.issue_count;
        state.calls.push(DestinationCall::CreateIssue(issue.clone()));
        Ok(CreatedIssue { id, index })
    }

    async fn create_issue_comment(&self, _repo: &RepoRef, index: u64, body: &str) -> Result<()> {
        let mut state = self.state.lock();
        if index == 0 || index > state.issue_count {
            return Err(MigrationError::NotFound(format!("issue {index}")));
        }
        state.calls.push(DestinationCall::CreateComment {
            index,
            body: body.to_string(),
        });
        Ok(())
    }
}
