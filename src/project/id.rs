use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::project::ValidationError;

// Namespace of the name-derived project ids. Changing it changes every derived id.
const PROJECT_NAMESPACE: Uuid = Uuid::from_u128(0x5f1c_9d2e_8a4b_4c3f_9e61_7b0d_2a8c_e413);

/// Identifier of a project stream.
///
/// Deserialization goes through [`ProjectId::parse`], so the unknown id never comes back from a
/// store or a bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Sentinel id carried by a project that does not exist. Never produced by
    /// [`ProjectId::from_name`] nor accepted by [`ProjectId::parse`].
    pub const UNKNOWN: ProjectId = ProjectId(Uuid::nil());

    /// Parses a project id from its canonical, hyphenated, form.
    pub fn parse(value: &str) -> Result<Self, ValidationError> {
        let malformed = || ValidationError::MalformedProjectId(value.to_string());

        // Uuid::parse_str is lenient about the layout, only the hyphenated one is canonical.
        if value.len() != 36 {
            return Err(malformed());
        }

        match Uuid::parse_str(value) {
            Ok(uuid) if !uuid.is_nil() => Ok(Self(uuid)),
            _ => Err(malformed()),
        }
    }

    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    /// Derives the id of a project from its name. The same name always yields the same id.
    pub fn from_name(name: &str) -> Self {
        Self(Uuid::new_v5(&PROJECT_NAMESPACE, name.as_bytes()))
    }

    pub fn is_unknown(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl FromStr for ProjectId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ProjectId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.to_string()
    }
}

impl Display for ProjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
