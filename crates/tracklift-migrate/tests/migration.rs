//! End-to-end migration passes against in-memory services.

use tracklift_migrate::memory::{DestinationCall, MemoryDestination, MemorySource, SourceRead};
use tracklift_migrate::{
    Decision, Issue, ItemState, Label, MigrationError, MigrationMode, Migrator, Milestone,
    MilestoneEdit, NewIssue, Note, RepoRef, UserMapEntry, UserMapper,
};

const PROJECT: u64 = 42;

fn repo() -> RepoRef {
    RepoRef::new("acme", "widgets")
}

fn users() -> UserMapper {
    UserMapper::new(&[UserMapEntry {
        from: "jdoe".to_string(),
        to: "john".to_string(),
    }])
}

/// Two milestones (the second closed), one issue on the closed milestone
/// labelled "bug", with two notes.
fn fixture() -> MemorySource {
    MemorySource::new()
        .with_milestone(Milestone {
            id: 501,
            title: "v1.0".to_string(),
            description: "First release".to_string(),
            state: ItemState::Open,
        })
        .with_milestone(Milestone {
            id: 502,
            title: "v0.9".to_string(),
            description: "Beta".to_string(),
            state: ItemState::Closed,
        })
        .with_label(Label {
            id: 7,
            name: "bug".to_string(),
            color: "#d9534f".to_string(),
        })
        .with_issue(Issue {
            id: 9001,
            iid: 1,
            title: "Crash on startup".to_string(),
            body: "Segfault when config is missing".to_string(),
            author: "jdoe".to_string(),
            milestone_id: Some(502),
            labels: vec!["bug".to_string()],
            state: ItemState::Closed,
        })
        .with_notes(
            1,
            vec![
                Note {
                    id: 11,
                    body: "Reproduced".to_string(),
                },
                Note {
                    id: 12,
                    body: "Fixed in main".to_string(),
                },
            ],
        )
}

#[tokio::test]
async fn commit_migrates_everything_in_order() {
    let source = fixture();
    let destination = MemoryDestination::new();
    let users = users();
    let repo = repo();

    let report = Migrator::new(&source, &destination, &users)
        .run(MigrationMode::Commit, PROJECT, &repo)
        .await
        .unwrap();

    let calls = destination.calls();
    assert_eq!(calls.len(), 7, "{calls:#?}");

    assert_eq!(
        calls[0],
        DestinationCall::CreateMilestone {
            title: "v1.0".to_string(),
            description: "First release".to_string(),
        }
    );
    assert_eq!(
        calls[1],
        DestinationCall::CreateMilestone {
            title: "v0.9".to_string(),
            description: "Beta".to_string(),
        }
    );

    let closed = destination.closed_milestones();
    assert_eq!(closed.len(), 1);
    let second_milestone = closed[0];
    assert_eq!(
        calls[2],
        DestinationCall::EditMilestone {
            id: second_milestone,
            edit: MilestoneEdit {
                title: "v0.9".to_string(),
                description: "Beta".to_string(),
                state: ItemState::Closed,
            },
        }
    );

    assert_eq!(
        calls[3],
        DestinationCall::CreateLabel {
            name: "bug".to_string(),
            color: "#d9534f".to_string(),
        }
    );
    let bug_id = destination.labels()[0].id;

    assert_eq!(
        calls[4],
        DestinationCall::CreateIssue(NewIssue {
            title: "Crash on startup".to_string(),
            body: "Segfault when config is missing".to_string(),
            assignee: "john".to_string(),
            milestone: Some(second_milestone),
            labels: vec![bug_id],
            closed: true,
        })
    );

    assert_eq!(
        calls[5],
        DestinationCall::CreateComment {
            index: 1,
            body: "Reproduced".to_string(),
        }
    );
    assert_eq!(
        calls[6],
        DestinationCall::CreateComment {
            index: 1,
            body: "Fixed in main".to_string(),
        }
    );

    assert_eq!(report.milestones_created, 2);
    assert_eq!(report.milestones_closed, 1);
    assert_eq!(report.issues_created, 1);
    assert_eq!(report.labels_created, 1);
    assert_eq!(report.comments_created, 2);
    assert!(report.completed_at.is_some());
}

#[tokio::test]
async fn simulate_and_commit_make_the_same_decisions() {
    let source = fixture();
    let users = users();
    let repo = repo();

    let simulated_destination = MemoryDestination::new();
    let simulated = Migrator::new(&source, &simulated_destination, &users)
        .run(MigrationMode::Simulate, PROJECT, &repo)
        .await
        .unwrap();
    let simulated_reads = source.reads();
    source.clear_reads();

    let committed_destination = MemoryDestination::new();
    let committed = Migrator::new(&source, &committed_destination, &users)
        .run(MigrationMode::Commit, PROJECT, &repo)
        .await
        .unwrap();
    let committed_reads: Vec<SourceRead> = source
        .reads()
        .into_iter()
        .filter(|r| !matches!(r, SourceRead::Labels(_)))
        .collect();

    assert!(simulated_destination.calls().is_empty());
    assert_eq!(simulated.comparable_decisions(), committed.comparable_decisions());
    assert_eq!(simulated_reads, committed_reads);

    // Simulate cannot know destination milestone IDs, so the source ID shows.
    let simulated_milestone = simulated.decisions.iter().find_map(|d| match d {
        Decision::CreateIssue { milestone, .. } => *milestone,
        _ => None,
    });
    assert_eq!(simulated_milestone, Some(502));

    assert!(committed
        .decisions
        .iter()
        .any(|d| matches!(d, Decision::LabelCreated { name, .. } if name == "bug")));
}

#[tokio::test]
async fn existing_destination_label_is_not_duplicated() {
    let source = fixture();
    let destination = MemoryDestination::new().with_label(Label {
        id: 3,
        name: "bug".to_string(),
        color: "#ee0701".to_string(),
    });
    let users = users();
    let repo = repo();

    let report = Migrator::new(&source, &destination, &users)
        .run(MigrationMode::Commit, PROJECT, &repo)
        .await
        .unwrap();

    let calls = destination.calls();
    assert!(!calls
        .iter()
        .any(|c| matches!(c, DestinationCall::CreateLabel { .. })));
    assert!(calls.iter().any(|c| matches!(
        c,
        DestinationCall::CreateIssue(NewIssue { labels, .. }) if labels == &vec![3]
    )));
    assert_eq!(report.labels_created, 0);
}

#[tokio::test]
async fn unknown_label_stops_the_run() {
    let source = MemorySource::new()
        .with_issue(Issue {
            id: 1,
            iid: 1,
            title: "First".to_string(),
            body: String::new(),
            author: "jdoe".to_string(),
            milestone_id: None,
            labels: vec!["ghost".to_string()],
            state: ItemState::Open,
        })
        .with_issue(Issue {
            id: 2,
            iid: 2,
            title: "Second".to_string(),
            body: String::new(),
            author: "jdoe".to_string(),
            milestone_id: None,
            labels: vec![],
            state: ItemState::Open,
        });
    let destination = MemoryDestination::new();
    let users = users();
    let repo = repo();

    let err = Migrator::new(&source, &destination, &users)
        .run(MigrationMode::Commit, PROJECT, &repo)
        .await
        .unwrap_err();

    assert!(matches!(err, MigrationError::UnresolvableLabel(ref name) if name == "ghost"));
    assert_eq!(err.exit_code(), 5);
    assert!(destination.calls().is_empty());
}

#[tokio::test]
async fn simulate_does_not_resolve_labels() {
    let source = MemorySource::new().with_issue(Issue {
        id: 1,
        iid: 1,
        title: "First".to_string(),
        body: String::new(),
        author: "jdoe".to_string(),
        milestone_id: None,
        labels: vec!["ghost".to_string()],
        state: ItemState::Open,
    });
    let destination = MemoryDestination::new();
    let users = users();
    let repo = repo();

    let report = Migrator::new(&source, &destination, &users)
        .run(MigrationMode::Simulate, PROJECT, &repo)
        .await
        .unwrap();

    assert_eq!(report.issues_created, 1);
    assert!(!source
        .reads()
        .iter()
        .any(|r| matches!(r, SourceRead::Labels(_))));
}
