//! Event sourcing engine: aggregates decide events from commands, event stores keep the streams,
//! and the [`CommandHandler`] ties both together with optimistic concurrency.
//!
//! The crate ships the `project` aggregate, an in-memory store, and behind cargo features a Redis
//! store (`redis`), a Postgres store (`postgres`), a Redis pub/sub bus (`redis`) and a Kafka bus
//! (`kafka`).

pub use crate::aggregate::Aggregate;
pub use crate::command::Command;
pub use crate::event::{Discriminated, Event};
pub use crate::handler::{CommandHandler, CommandOutcome};
pub use crate::state::{State, VersionedState};
pub use crate::types::{SequenceNumber, StreamId, StreamKey};

mod aggregate;
mod command;
mod event;
mod handler;
mod state;
mod types;

pub mod bus;
pub mod codec;
pub mod project;
#[cfg(feature = "postgres")]
mod sql;
pub mod store;
