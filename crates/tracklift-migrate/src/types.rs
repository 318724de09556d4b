//! Common types for migration operations.

use chrono::{DateTime, Utc};
use std::fmt;

/// Whether a run may write to the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationMode {
    /// Perform every read, skip every write.
    Simulate,
    /// Perform every read and every write.
    Commit,
}

impl MigrationMode {
    /// Whether destination writes are enabled.
    pub fn writes(self) -> bool {
        matches!(self, Self::Commit)
    }
}

impl fmt::Display for MigrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simulate => write!(f, "simulate"),
            Self::Commit => write!(f, "commit"),
        }
    }
}

/// Options for controlling how a migration resolves references.
#[derive(Debug, Clone, Default)]
pub struct MigrationOptions {
    /// Fail instead of passing a source milestone ID through when no
    /// destination milestone was created for it. Only applies in commit mode.
    pub strict_milestones: bool,
}

impl MigrationOptions {
    /// Enable or disable strict milestone resolution.
    pub fn with_strict_milestones(mut self, strict: bool) -> Self {
        self.strict_milestones = strict;
        self
    }
}

/// Open/closed state shared by milestones and issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    Open,
    Closed,
}

impl ItemState {
    /// Whether the item is closed.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// A project on the source service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: u64,
    pub name: String,
}

/// A repository on the destination service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: u64,
    pub name: String,
    pub owner: String,
}

impl Repository {
    /// Address used for destination API calls.
    pub fn to_ref(&self) -> RepoRef {
        RepoRef::new(&self.owner, &self.name)
    }
}

/// Owner/name pair addressing a destination repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A milestone read from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub state: ItemState,
}

/// An issue read from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Global source ID.
    pub id: u64,
    /// Per-project sequence number, expected to run 1, 2, 3, ...
    pub iid: u64,
    pub title: String,
    pub body: String,
    pub author: String,
    pub milestone_id: Option<u64>,
    pub labels: Vec<String>,
    pub state: ItemState,
}

/// A label on either service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub id: u64,
    pub name: String,
    pub color: String,
}

/// A comment (GitLab "note") on a source issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: u64,
    pub body: String,
}

/// A milestone as created on the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedMilestone {
    pub id: u64,
}

/// An issue as created on the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    pub id: u64,
    /// Destination-assigned index used to attach comments.
    pub index: u64,
}

/// Fields sent when editing a destination milestone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MilestoneEdit {
    pub title: String,
    pub description: String,
    pub state: ItemState,
}

/// Fields sent when creating a destination issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub body: String,
    pub assignee: String,
    pub milestone: Option<u64>,
    pub labels: Vec<u64>,
    pub closed: bool,
}

/// One operator-visible decision made during a run.
///
/// Simulate and commit produce the same sequence, except that only commit
/// emits label resolution outcomes and only commit has real milestone IDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    CreateMilestone {
        title: String,
    },
    CloseMilestone {
        title: String,
    },
    CreateIssue {
        iid: u64,
        title: String,
        assignee: String,
        milestone: Option<u64>,
        labels: Vec<String>,
        closed: bool,
    },
    LabelFound {
        name: String,
        id: u64,
    },
    LabelCreated {
        name: String,
        color: String,
        id: u64,
    },
    AddNote {
        note_id: u64,
    },
}

impl Decision {
    /// Whether this decision only exists when writes are enabled.
    pub fn is_commit_only(&self) -> bool {
        matches!(self, Self::LabelFound { .. } | Self::LabelCreated { .. })
    }

    /// Copy with destination milestone IDs removed, for comparing runs.
    pub fn without_milestone(&self) -> Self {
        match self {
            Self::CreateIssue {
                iid,
                title,
                assignee,
                labels,
                closed,
                ..
            } => Self::CreateIssue {
                iid: *iid,
                title: title.clone(),
                assignee: assignee.clone(),
                milestone: None,
                labels: labels.clone(),
                closed: *closed,
            },
            other => other.clone(),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateMilestone { title } => write!(f, "Create Milestone: {title}"),
            Self::CloseMilestone { title } => write!(f, "Marking as closed: {title}"),
            Self::CreateIssue {
                iid,
                title,
                assignee,
                milestone,
                labels,
                closed,
            } => {
                write!(f, "Create Issue {iid} : {title} (assignee {assignee}")?;
                if let Some(milestone) = milestone {
                    write!(f, ", milestone {milestone}")?;
                }
                if !labels.is_empty() {
                    write!(f, ", labels [{}]", labels.join(", "))?;
                }
                let state = if *closed { "closed" } else { "open" };
                write!(f, ", {state})")
            }
            Self::LabelFound { name, .. } => write!(f, "Found label {name}"),
            Self::LabelCreated { name, color, .. } => {
                write!(f, "Create label {name} color {color}")
            }
            Self::AddNote { note_id } => write!(f, "Adding note {note_id}"),
        }
    }
}

/// Report of a completed migration pass.
#[derive(Debug, Clone)]
pub struct MigrationReport {
    /// Mode the pass ran in.
    pub mode: MigrationMode,

    /// Milestones created on the destination (or that would be).
    pub milestones_created: usize,

    /// Milestones edited to closed.
    pub milestones_closed: usize,

    /// Issues created.
    pub issues_created: usize,

    /// Labels created on the destination. Always zero in simulate mode.
    pub labels_created: usize,

    /// Comments created.
    pub comments_created: usize,

    /// Every decision, in the order it was made.
    pub decisions: Vec<Decision>,

    /// Start time of the pass.
    pub started_at: Option<DateTime<Utc>>,

    /// End time of the pass.
    pub completed_at: Option<DateTime<Utc>>,
}

impl MigrationReport {
    /// Create a new empty report.
    pub fn new(mode: MigrationMode) -> Self {
        Self {
            mode,
            milestones_created: 0,
            milestones_closed: 0,
            issues_created: 0,
            labels_created: 0,
            comments_created: 0,
            decisions: Vec::new(),
            started_at: Some(Utc::now()),
            completed_at: None,
        }
    }

    /// Mark the pass as complete.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Total entities created (or planned) during the pass.
    pub fn total_items(&self) -> usize {
        self.milestones_created + self.issues_created + self.labels_created + self.comments_created
    }

    /// Decisions comparable across modes.
    pub fn comparable_decisions(&self) -> Vec<Decision> {
        self.decisions
            .iter()
            .filter(|d| !d.is_commit_only())
            .map(Decision::without_milestone)
            .collect()
    }

    /// Get the duration of the pass.
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// Print a summary of the pass.
    pub fn print_summary(&self) {
        let heading = match self.mode {
            MigrationMode::Simulate => "Simulation Summary",
            MigrationMode::Commit => "Migration Summary",
        };
        println!("\n=== {} ===\n", console::style(heading).bold());
        println!("Milestones:         {}", self.milestones_created);
        println!("  marked closed:    {}", self.milestones_closed);
        println!("Issues:             {}", self.issues_created);
        println!("Comments:           {}", self.comments_created);
        if self.mode.writes() {
            println!("Labels created:     {}", self.labels_created);
        }
        println!("Total:              {}", self.total_items());

        if let Some(duration) = self.duration() {
            println!("\nCompleted in {} seconds", duration.num_seconds());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_gates_writes() {
        assert!(!MigrationMode::Simulate.writes());
        assert!(MigrationMode::Commit.writes());
    }

    #[test]
    fn test_decision_display() {
        let d = Decision::CreateIssue {
            iid: 1,
            title: "Crash on start".into(),
            assignee: "alice".into(),
            milestone: Some(7),
            labels: vec!["bug".into()],
            closed: true,
        };
        assert_eq!(
            d.to_string(),
            "Create Issue 1 : Crash on start (assignee alice, milestone 7, labels [bug], closed)"
        );
        assert_eq!(
            Decision::CreateMilestone { title: "v1".into() }.to_string(),
            "Create Milestone: v1"
        );
        assert_eq!(Decision::AddNote { note_id: 42 }.to_string(), "Adding note 42");
    }

    #[test]
    fn test_comparable_decisions_drop_commit_only_details() {
        let mut report = MigrationReport::new(MigrationMode::Commit);
        report.decisions.push(Decision::LabelFound {
            name: "bug".into(),
            id: 3,
        });
        report.decisions.push(Decision::CreateIssue {
            iid: 1,
            title: "t".into(),
            assignee: "a".into(),
            milestone: Some(9),
            labels: vec!["bug".into()],
            closed: false,
        });

        let comparable = report.comparable_decisions();
        assert_eq!(comparable.len(), 1);
        assert!(matches!(
            comparable[0],
            Decision::CreateIssue { milestone: None, .. }
        ));
    }

    #[test]
    fn test_report_totals() {
        let mut report = MigrationReport::new(MigrationMode::Simulate);
        report.milestones_created = 2;
        report.issues_created = 1;
        report.comments_created = 2;
        report.complete();

        assert_eq!(report.total_items(), 5);
        assert!(report.duration().is_some());
    }
}
