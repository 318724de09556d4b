//! CLI command implementations.

use crate::select;
use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::Path;
use tracklift_migrate::{
    Config, ConsoleProgressReporter, DestinationService, GitLabClient, GogsClient,
    MigrationMode, MigrationProgress, MigrationReport, Migrator, RepoRef, SourceService,
    UserMapper,
};

/// Options for the `migrate` command.
#[derive(Debug)]
pub struct MigrateOptions<'a> {
    pub config: &'a Path,
    pub source: Option<u64>,
    pub destination: Option<u64>,
    pub simulate_only: bool,
}

fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("loading {}", path.display()))
}

fn connect(config: &Config) -> Result<(GitLabClient, GogsClient)> {
    let gitlab = GitLabClient::new(&config.gitlab_url, &config.gitlab_api_key)?;
    let gogs = GogsClient::new(&config.gogs_url, &config.gogs_api_key)?;
    Ok((gitlab, gogs))
}

/// Migrate one GitLab project into one Gogs repository.
///
/// Runs a simulate pass, waits for the operator to press Enter, then runs
/// the commit pass.
pub async fn migrate(options: MigrateOptions<'_>) -> Result<()> {
    let config = load_config(options.config)?;
    config.print_summary();
    let (gitlab, gogs) = connect(&config)?;

    let stdout = std::io::stdout();

    let projects = gitlab.list_projects().await?;
    let project = select::choose(
        &projects,
        options.source,
        "Select source gitlab project: ",
        &mut std::io::stdin().lock(),
        &mut stdout.lock(),
    )?;

    let repos = gogs.list_repositories().await?;
    let repo = select::choose(
        &repos,
        options.destination,
        "Select destination gogs project: ",
        &mut std::io::stdin().lock(),
        &mut stdout.lock(),
    )?;

    tracing::info!(project = project.id, repo = %repo.to_ref(), "Selected migration pair");

    let users = UserMapper::new(&config.user_map);
    let target = repo.to_ref();
    let migrator = |progress: MigrationProgress| {
        Migrator::new(&gitlab, &gogs, &users)
            .with_options(config.options())
            .with_progress(progress)
    };

    println!("\nSimulated migration of {} to {}", project.name, repo.name);
    run_pass(migrator, MigrationMode::Simulate, project.id, &target).await?;

    if options.simulate_only {
        return Ok(());
    }

    println!("\nCompleted simulation. Press <Enter> to perform migration...");
    std::io::stdin().lock().read_line(&mut String::new())?;

    println!("Migrating {} to {}", project.name, repo.name);
    run_pass(migrator, MigrationMode::Commit, project.id, &target).await?;

    Ok(())
}

async fn run_pass<'a, F>(
    build: F,
    mode: MigrationMode,
    project: u64,
    repo: &RepoRef,
) -> Result<()>
where
    F: Fn(MigrationProgress) -> Migrator<'a>,
{
    let reporter = ConsoleProgressReporter::new();
    let migrator = build(MigrationProgress::with_callback(reporter.callback()));

    let report: MigrationReport = match migrator.run(mode, project, repo).await {
        Ok(report) => report,
        Err(e) => {
            reporter.finish("failed");
            return Err(e.into());
        }
    };

    reporter.finish("done");
    report.print_summary();
    Ok(())
}

/// List GitLab projects and Gogs repositories visible to the configured tokens.
pub async fn list(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let (gitlab, gogs) = connect(&config)?;
    let mut out = std::io::stdout().lock();

    writeln!(out, "GitLab projects:")?;
    select::print_items(&mut out, &gitlab.list_projects().await?)?;

    writeln!(out, "\nGogs repositories:")?;
    select::print_items(&mut out, &gogs.list_repositories().await?)?;

    Ok(())
}
