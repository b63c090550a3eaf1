use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::project::ValidationError;

/// A document describing a project. Documents are compared by value, so attaching the same
/// document twice is detected and ignored.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Document {
    Embedded { name: String, content: String },
    ExternalLink { name: String, url: String },
    InternalLink { name: String, url: String },
}

impl Document {
    pub fn embedded(name: impl Into<String>, content: impl Into<String>) -> Result<Self, ValidationError> {
        let (name, content) = checked(name.into(), content.into())?;
        Ok(Self::Embedded { name, content })
    }

    pub fn external_link(name: impl Into<String>, url: impl Into<String>) -> Result<Self, ValidationError> {
        let (name, url) = checked(name.into(), url.into())?;
        Ok(Self::ExternalLink { name, url })
    }

    pub fn internal_link(name: impl Into<String>, url: impl Into<String>) -> Result<Self, ValidationError> {
        let (name, url) = checked(name.into(), url.into())?;
        Ok(Self::InternalLink { name, url })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Embedded { name, .. } | Self::ExternalLink { name, .. } | Self::InternalLink { name, .. } => name,
        }
    }
}

fn checked(name: String, body: String) -> Result<(String, String), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::BlankDocumentName);
    }

    if body.trim().is_empty() {
        return Err(ValidationError::EmptyDocument(name));
    }

    Ok((name, body))
}

/// A delivered build of a project, identified by its version.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildId(String);

impl BuildId {
    pub fn new(version: impl Into<String>) -> Result<Self, ValidationError> {
        let version: String = version.into();

        if version.trim().is_empty() {
            Err(ValidationError::BlankBuildId)
        } else {
            Ok(Self(version))
        }
    }

    pub fn version(&self) -> &str {
        &self.0
    }
}

impl Display for BuildId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
