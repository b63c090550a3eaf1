use std::collections::BTreeSet;

use crate::project::{BuildId, Document, ProjectId};
use crate::state::State;

/// Lifecycle of a project: it is described first, and becomes alive with its first build.
/// There is no way back.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectState {
    NotExist,
    Describing {
        id: ProjectId,
        name: String,
        scm_url: String,
        documents: BTreeSet<Document>,
    },
    Alive {
        id: ProjectId,
        name: String,
        scm_url: String,
        documents: BTreeSet<Document>,
        deliveries: BTreeSet<BuildId>,
    },
}

impl ProjectState {
    pub fn id(&self) -> &ProjectId {
        match self {
            Self::NotExist => &ProjectId::UNKNOWN,
            Self::Describing { id, .. } | Self::Alive { id, .. } => id,
        }
    }

    pub fn exists(&self) -> bool {
        !matches!(self, Self::NotExist)
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::NotExist => None,
            Self::Describing { name, .. } | Self::Alive { name, .. } => Some(name),
        }
    }

    pub fn documents(&self) -> Option<&BTreeSet<Document>> {
        match self {
            Self::NotExist => None,
            Self::Describing { documents, .. } | Self::Alive { documents, .. } => Some(documents),
        }
    }

    pub fn deliveries(&self) -> Option<&BTreeSet<BuildId>> {
        match self {
            Self::Alive { deliveries, .. } => Some(deliveries),
            _ => None,
        }
    }
}

impl State for ProjectState {
    type StreamId = ProjectId;

    fn stream_id(&self) -> &ProjectId {
        self.id()
    }
}
