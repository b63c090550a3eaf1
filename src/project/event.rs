use serde::{Deserialize, Serialize};

use crate::event::{Discriminated, Event};
use crate::project::{BuildId, Document, ProjectId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "eventType")]
pub enum ProjectEvent {
    ProjectCreated { id: ProjectId, name: String },
    DocumentAdded { id: ProjectId, document: Document },
    ProjectBuilt { id: ProjectId, build: BuildId },
}

impl Event for ProjectEvent {
    type StreamId = ProjectId;

    fn stream_id(&self) -> &ProjectId {
        match self {
            Self::ProjectCreated { id, .. } | Self::DocumentAdded { id, .. } | Self::ProjectBuilt { id, .. } => id,
        }
    }
}

impl Discriminated for ProjectEvent {
    const DISCRIMINATORS: &'static [&'static str] = &["ProjectCreated", "DocumentAdded", "ProjectBuilt"];

    fn discriminator(&self) -> &'static str {
        match self {
            Self::ProjectCreated { .. } => "ProjectCreated",
            Self::DocumentAdded { .. } => "DocumentAdded",
            Self::ProjectBuilt { .. } => "ProjectBuilt",
        }
    }
}
