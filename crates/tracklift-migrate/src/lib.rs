//! # Tracklift Migration Engine
//!
//! Moves a GitLab project's milestones, issues, labels and comments into a
//! Gogs repository, remapping milestone and label IDs along the way.
//!
//! ## Features
//!
//! - **Two modes**: simulate (every read, no writes) and commit
//! - **Identifier remapping**: source milestone IDs are translated to the IDs
//!   the destination assigns
//! - **User mapping**: GitLab usernames are translated to Gogs usernames
//! - **Label copying**: labels are found or created on demand with their
//!   source color
//!
//! ## Example
//!
//! ```rust,ignore
//! use tracklift_migrate::{
//!     Config, GitLabClient, GogsClient, MigrationMode, Migrator, RepoRef, UserMapper,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.json".as_ref())?;
//!     let gitlab = GitLabClient::new(&config.gitlab_url, &config.gitlab_api_key)?;
//!     let gogs = GogsClient::new(&config.gogs_url, &config.gogs_api_key)?;
//!     let users = UserMapper::new(&config.user_map);
//!
//!     let migrator = Migrator::new(&gitlab, &gogs, &users).with_options(config.options());
//!     let repo = RepoRef::new("acme", "widgets");
//!
//!     migrator.run(MigrationMode::Simulate, 42, &repo).await?.print_summary();
//!     migrator.run(MigrationMode::Commit, 42, &repo).await?.print_summary();
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod executor;
pub mod gitlab;
pub mod gogs;
pub mod labels;
pub mod mapping;
pub mod memory;
pub mod progress;
pub mod service;
pub mod types;

// Re-export main types
pub use config::{Config, UserMapEntry};
pub use error::{MigrationError, Result};
pub use executor::Migrator;
pub use gitlab::GitLabClient;
pub use gogs::GogsClient;
pub use labels::{LabelResolution, LabelResolver};
pub use mapping::{IdentifierMap, UserMapper};
pub use progress::{ConsoleProgressReporter, MigrationPhase, MigrationProgress, ProgressCallback};
pub use service::{DestinationService, SourceService};
pub use types::*;

/// Version of the migration engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
