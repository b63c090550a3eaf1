use crate::project::ProjectId;

/// Reasons a project command gets rejected. These are business outcomes, not faults.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProjectError {
    #[error("project {0} does not exist yet")]
    NotExist(ProjectId),
    #[error("project {0} already exists")]
    AlreadyExists(ProjectId),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Malformed input, refused before any store is touched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("project id `{0}` is not in canonical uuid form")]
    MalformedProjectId(String),
    #[error("the unknown project id cannot identify a project")]
    UnknownProjectId,
    #[error("project name must not be blank")]
    BlankProjectName,
    #[error("document name must not be blank")]
    BlankDocumentName,
    #[error("document `{0}` has neither content nor url")]
    EmptyDocument(String),
    #[error("build version must not be blank")]
    BlankBuildId,
}
