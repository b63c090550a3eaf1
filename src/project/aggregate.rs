use std::collections::BTreeSet;

use crate::project::{ProjectCommand, ProjectError, ProjectEvent, ProjectId, ProjectState, ValidationError};
use crate::Aggregate;

/// The project lifecycle: a project is created, described with documents, and becomes alive
/// once its first build gets delivered.
pub struct Project;

impl Aggregate for Project {
    const NAME: &'static str = "project";

    type StreamId = ProjectId;
    type Command = ProjectCommand;
    type State = ProjectState;
    type Event = ProjectEvent;
    type Error = ProjectError;

    fn decide(command: &ProjectCommand, state: &ProjectState) -> Result<Vec<ProjectEvent>, ProjectError> {
        match (state, command) {
            (ProjectState::NotExist, ProjectCommand::CreateProject { id, name }) => {
                if id.is_unknown() {
                    return Err(ValidationError::UnknownProjectId.into());
                }

                if name.trim().is_empty() {
                    return Err(ValidationError::BlankProjectName.into());
                }

                Ok(vec![ProjectEvent::ProjectCreated {
                    id: *id,
                    name: name.clone(),
                }])
            }
            (ProjectState::NotExist, ProjectCommand::AddDocument { id, .. } | ProjectCommand::AttachBuild { id, .. }) => {
                Err(ProjectError::NotExist(*id))
            }
            (ProjectState::Describing { .. } | ProjectState::Alive { .. }, ProjectCommand::CreateProject { id, .. }) => {
                Err(ProjectError::AlreadyExists(*id))
            }
            (
                ProjectState::Describing { documents, .. } | ProjectState::Alive { documents, .. },
                ProjectCommand::AddDocument { id, document },
            ) => {
                if documents.contains(document) {
                    Ok(vec![])
                } else {
                    Ok(vec![ProjectEvent::DocumentAdded {
                        id: *id,
                        document: document.clone(),
                    }])
                }
            }
            (ProjectState::Describing { .. }, ProjectCommand::AttachBuild { id, build }) => Ok(vec![ProjectEvent::ProjectBuilt {
                id: *id,
                build: build.clone(),
            }]),
            (ProjectState::Alive { deliveries, .. }, ProjectCommand::AttachBuild { id, build }) => {
                if deliveries.contains(build) {
                    Ok(vec![])
                } else {
                    Ok(vec![ProjectEvent::ProjectBuilt {
                        id: *id,
                        build: build.clone(),
                    }])
                }
            }
        }
    }

    fn apply(state: ProjectState, event: &ProjectEvent) -> ProjectState {
        match (state, event) {
            (ProjectState::NotExist, ProjectEvent::ProjectCreated { id, name }) => ProjectState::Describing {
                id: *id,
                name: name.clone(),
                scm_url: String::new(),
                documents: BTreeSet::new(),
            },
            (
                ProjectState::Describing {
                    id,
                    name,
                    scm_url,
                    mut documents,
                },
                ProjectEvent::DocumentAdded { document, .. },
            ) => {
                documents.insert(document.clone());
                ProjectState::Describing {
                    id,
                    name,
                    scm_url,
                    documents,
                }
            }
            (
                ProjectState::Describing {
                    id,
                    name,
                    scm_url,
                    documents,
                },
                ProjectEvent::ProjectBuilt { build, .. },
            ) => ProjectState::Alive {
                id,
                name,
                scm_url,
                documents,
                deliveries: BTreeSet::from([build.clone()]),
            },
            (
                ProjectState::Alive {
                    id,
                    name,
                    scm_url,
                    mut documents,
                    deliveries,
                },
                ProjectEvent::DocumentAdded { document, .. },
            ) => {
                documents.insert(document.clone());
                ProjectState::Alive {
                    id,
                    name,
                    scm_url,
                    documents,
                    deliveries,
                }
            }
            (
                ProjectState::Alive {
                    id,
                    name,
                    scm_url,
                    documents,
                    mut deliveries,
                },
                ProjectEvent::ProjectBuilt { build, .. },
            ) => {
                deliveries.insert(build.clone());
                ProjectState::Alive {
                    id,
                    name,
                    scm_url,
                    documents,
                    deliveries,
                }
            }
            (state, _) => state,
        }
    }

    fn empty_state() -> ProjectState {
        ProjectState::NotExist
    }
}
