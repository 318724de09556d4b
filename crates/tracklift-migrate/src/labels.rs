//! Find-or-create resolution of destination labels by name.

use crate::error::{MigrationError, Result};
use crate::service::{DestinationService, SourceService};
use crate::types::RepoRef;
use tracing::{debug, info};

/// Outcome of resolving one label name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelResolution {
    /// The destination already had a label with this name.
    Found(u64),
    /// The label was copied from the source.
    Created { id: u64, color: String },
}

impl LabelResolution {
    /// Destination label ID.
    pub fn id(&self) -> u64 {
        match self {
            Self::Found(id) | Self::Created { id, .. } => *id,
        }
    }
}

/// Resolves label names to destination label IDs, creating missing labels.
///
/// Both label listings are fetched fresh on every call, so labels created
/// earlier in the same run are always seen.
pub struct LabelResolver<'a> {
    source: &'a dyn SourceService,
    destination: &'a dyn DestinationService,
    project: u64,
    repo: &'a RepoRef,
}

impl<'a> LabelResolver<'a> {
    pub fn new(
        source: &'a dyn SourceService,
        destination: &'a dyn DestinationService,
        project: u64,
        repo: &'a RepoRef,
    ) -> Self {
        Self {
            source,
            destination,
            project,
            repo,
        }
    }

    /// Returns the destination ID of the label called `name`.
    ///
    /// Fails with [`MigrationError::UnresolvableLabel`] when neither service
    /// has a label with that exact name.
    pub async fn resolve(&self, name: &str) -> Result<LabelResolution> {
        let existing = self.destination.list_labels(self.repo).await?;
        if let Some(label) = existing.iter().rfind(|l| l.name == name) {
            debug!(label = %name, id = label.id, "Found label");
            return Ok(LabelResolution::Found(label.id));
        }

        let source_labels = self.source.list_labels(self.project).await?;
        let Some(source_label) = source_labels.iter().find(|l| l.name == name) else {
            return Err(MigrationError::UnresolvableLabel(name.to_string()));
        };

        info!(label = %name, color = %source_label.color, "Creating label");
        let created = self
            .destination
            .create_label(self.repo, &source_label.name, &source_label.color)
            .await?;

        Ok(LabelResolution::Created {
            id: created.id,
            color: source_label.color.clone(),
        })
    }
}
