//! The migration executor.
//!
//! A pass walks milestones, then issues in ascending order, then each
//! issue's notes. Every listing runs in both modes; writes only run in
//! [`MigrationMode::Commit`]. The one place the modes legitimately diverge is
//! milestone linkage: simulate never creates milestones, so its
//! [`IdentifierMap`] stays empty and issue milestones pass through unmapped.

use crate::error::{MigrationError, Result};
use crate::labels::{LabelResolution, LabelResolver};
use crate::mapping::{IdentifierMap, UserMapper};
use crate::progress::{MigrationPhase, MigrationProgress};
use crate::service::{DestinationService, SourceService};
use crate::types::{
    Decision, Issue, ItemState, MigrationMode, MigrationOptions, MigrationReport, MilestoneEdit,
    NewIssue, RepoRef,
};
use tracing::{debug, info, warn};

/// State owned by a single pass.
struct Pass<'r> {
    mode: MigrationMode,
    project: u64,
    repo: &'r RepoRef,
    milestones: IdentifierMap,
    report: MigrationReport,
}

/// Migrates one source project into one destination repository.
pub struct Migrator<'a> {
    source: &'a dyn SourceService,
    destination: &'a dyn DestinationService,
    users: &'a UserMapper,
    options: MigrationOptions,
    progress: MigrationProgress,
}

impl<'a> Migrator<'a> {
    /// Create a new migrator.
    pub fn new(
        source: &'a dyn SourceService,
        destination: &'a dyn DestinationService,
        users: &'a UserMapper,
    ) -> Self {
        Self {
            source,
            destination,
            users,
            options: MigrationOptions::default(),
            progress: MigrationProgress::new(),
        }
    }

    /// Set migration options.
    pub fn with_options(mut self, options: MigrationOptions) -> Self {
        self.options = options;
        self
    }

    /// Set a progress tracker.
    pub fn with_progress(mut self, progress: MigrationProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Runs one pass.
    ///
    /// The first error ends the pass. In commit mode whatever was written
    /// before the error stays on the destination.
    pub async fn run(
        &self,
        mode: MigrationMode,
        project: u64,
        repo: &RepoRef,
    ) -> Result<MigrationReport> {
        info!(%mode, project, repo = %repo, "Starting migration pass");
        self.progress.set_phase(MigrationPhase::Initializing, 1);

        let mut pass = Pass {
            mode,
            project,
            repo,
            milestones: IdentifierMap::new(),
            report: MigrationReport::new(mode),
        };

        self.migrate_milestones(&mut pass).await?;
        self.migrate_issues(&mut pass).await?;

        self.progress.set_phase(MigrationPhase::Complete, 1);
        pass.report.complete();
        info!(
            %mode,
            milestones = pass.report.milestones_created,
            issues = pass.report.issues_created,
            comments = pass.report.comments_created,
            "Migration pass finished"
        );

        Ok(pass.report)
    }

    async fn migrate_milestones(&self, pass: &mut Pass<'_>) -> Result<()> {
        let milestones = self.source.list_milestones(pass.project).await?;
        self.progress
            .set_phase(MigrationPhase::MigratingMilestones, milestones.len() as u64);

        for milestone in &milestones {
            self.decide(
                pass,
                Decision::CreateMilestone {
                    title: milestone.title.clone(),
                },
            );

            let created = if pass.mode.writes() {
                let created = self
                    .destination
                    .create_milestone(pass.repo, &milestone.title, &milestone.description)
                    .await?;
                pass.milestones.record_mapping(milestone.id, created.id);
                debug!(source = milestone.id, destination = created.id, "Mapped milestone");
                Some(created)
            } else {
                None
            };
            pass.report.milestones_created += 1;

            if milestone.state.is_closed() {
                self.decide(
                    pass,
                    Decision::CloseMilestone {
                        title: milestone.title.clone(),
                    },
                );
                if let Some(created) = &created {
                    let edit = MilestoneEdit {
                        title: milestone.title.clone(),
                        description: milestone.description.clone(),
                        state: ItemState::Closed,
                    };
                    self.destination
                        .edit_milestone(pass.repo, created.id, &edit)
                        .await?;
                }
                pass.report.milestones_closed += 1;
            }

            self.progress.increment(Some(&milestone.title));
        }

        Ok(())
    }

    async fn migrate_issues(&self, pass: &mut Pass<'_>) -> Result<()> {
        let issues = self.source.list_issues(pass.project).await?;
        self.progress
            .set_phase(MigrationPhase::MigratingIssues, issues.len() as u64);

        let mut expected = 0;
        for issue in &issues {
            expected += 1;
            if issue.iid != expected {
                return Err(MigrationError::IssueSequenceMismatch {
                    expected,
                    found: issue.iid,
                });
            }

            let index = self.migrate_issue(pass, issue).await?;
            self.migrate_comments(pass, issue, index).await?;

            self.progress.increment(Some(&format!("Issue #{}", issue.iid)));
        }

        Ok(())
    }

    /// Creates one issue. Returns the destination index in commit mode.
    async fn migrate_issue(&self, pass: &mut Pass<'_>, issue: &Issue) -> Result<Option<u64>> {
        let assignee = self.users.map(&issue.author).to_string();
        let milestone = issue
            .milestone_id
            .map(|id| self.resolve_milestone(pass, id))
            .transpose()?;
        let closed = issue.state.is_closed();

        self.decide(
            pass,
            Decision::CreateIssue {
                iid: issue.iid,
                title: issue.title.clone(),
                assignee: assignee.clone(),
                milestone,
                labels: issue.labels.clone(),
                closed,
            },
        );

        let index = if pass.mode.writes() {
            let labels = self.resolve_labels(pass, &issue.labels).await?;
            let created = self
                .destination
                .create_issue(
                    pass.repo,
                    &NewIssue {
                        title: issue.title.clone(),
                        body: issue.body.clone(),
                        assignee,
                        milestone,
                        labels,
                        closed,
                    },
                )
                .await?;
            debug!(iid = issue.iid, id = created.id, index = created.index, "Created issue");
            Some(created.index)
        } else {
            None
        };
        pass.report.issues_created += 1;

        Ok(index)
    }

    async fn migrate_comments(
        &self,
        pass: &mut Pass<'_>,
        issue: &Issue,
        index: Option<u64>,
    ) -> Result<()> {
        let notes = self.source.list_notes(pass.project, issue.iid).await?;

        for note in &notes {
            self.decide(pass, Decision::AddNote { note_id: note.id });
            if let Some(index) = index {
                self.destination
                    .create_issue_comment(pass.repo, index, &note.body)
                    .await?;
            }
            pass.report.comments_created += 1;
        }

        Ok(())
    }

    async fn resolve_labels(&self, pass: &mut Pass<'_>, names: &[String]) -> Result<Vec<u64>> {
        let resolver = LabelResolver::new(self.source, self.destination, pass.project, pass.repo);

        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let resolution = resolver.resolve(name).await?;
            let decision = match &resolution {
                LabelResolution::Found(id) => Decision::LabelFound {
                    name: name.clone(),
                    id: *id,
                },
                LabelResolution::Created { id, color } => {
                    pass.report.labels_created += 1;
                    Decision::LabelCreated {
                        name: name.clone(),
                        color: color.clone(),
                        id: *id,
                    }
                }
            };
            self.decide(pass, decision);
            ids.push(resolution.id());
        }

        Ok(ids)
    }

    fn resolve_milestone(&self, pass: &Pass<'_>, source: u64) -> Result<u64> {
        if let Some(destination) = pass.milestones.lookup(source) {
            return Ok(destination);
        }
        if !pass.mode.writes() {
            return Ok(pass.milestones.resolve(source));
        }
        if self.options.strict_milestones {
            return Err(MigrationError::UnmappedMilestone(source));
        }

        warn!(milestone = source, "No destination milestone, passing source ID through");
        Ok(pass.milestones.resolve(source))
    }

    fn decide(&self, pass: &mut Pass<'_>, decision: Decision) {
        info!(mode = %pass.mode, "{decision}");
        self.progress.message(&decision.to_string());
        pass.report.decisions.push(decision);
    }
}
