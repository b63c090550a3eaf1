//! The project aggregate: a project is created from its name, described with documents and
//! brought alive by its first delivered build.

pub use aggregate::Project;
pub use command::ProjectCommand;
pub use document::{BuildId, Document};
pub use error::{ProjectError, ValidationError};
pub use event::ProjectEvent;
pub use id::ProjectId;
pub use state::ProjectState;

mod aggregate;
mod command;
mod document;
mod error;
mod event;
mod id;
mod state;
