use crate::command::Command;
use crate::project::{BuildId, Document, ProjectId, ValidationError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProjectCommand {
    CreateProject { id: ProjectId, name: String },
    AddDocument { id: ProjectId, document: Document },
    AttachBuild { id: ProjectId, build: BuildId },
}

impl ProjectCommand {
    /// Creation command for a project whose id is derived from its name.
    pub fn create_named(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name: String = name.into();

        if name.trim().is_empty() {
            return Err(ValidationError::BlankProjectName);
        }

        Ok(Self::CreateProject {
            id: ProjectId::from_name(&name),
            name,
        })
    }

    pub fn add_document(id: ProjectId, document: Document) -> Self {
        Self::AddDocument { id, document }
    }

    pub fn attach_build(id: ProjectId, build: BuildId) -> Self {
        Self::AttachBuild { id, build }
    }
}

impl Command for ProjectCommand {
    type StreamId = ProjectId;

    fn stream_id(&self) -> &ProjectId {
        match self {
            Self::CreateProject { id, .. } | Self::AddDocument { id, .. } | Self::AttachBuild { id, .. } => id,
        }
    }
}
