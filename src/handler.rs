use std::fmt::{Debug, Formatter};

use crate::state::VersionedState;
use crate::store::{Appended, EventStore, StoreEvent};
use crate::Aggregate;

/// What became of a handled command.
///
/// Rejections and no-ops are regular outcomes: only store failures are errors.
pub enum CommandOutcome<A>
where
    A: Aggregate,
{
    /// The aggregate rejected the command. Nothing was appended.
    Failed { command: A::Command, reason: A::Error },
    /// The command was valid but already satisfied. Nothing was appended.
    Noop { command: A::Command },
    /// The decided events were appended to the stream.
    Succeeded {
        command: A::Command,
        events: Vec<StoreEvent<A::Event>>,
    },
}

impl<A> CommandOutcome<A>
where
    A: Aggregate,
{
    pub fn command(&self) -> &A::Command {
        match self {
            Self::Failed { command, .. } | Self::Noop { command } | Self::Succeeded { command, .. } => command,
        }
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded { .. })
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// The appended events, empty unless the command succeeded.
    pub fn events(&self) -> &[StoreEvent<A::Event>] {
        match self {
            Self::Succeeded { events, .. } => events,
            _ => &[],
        }
    }

    /// The rejection reason, if the command failed.
    pub fn reason(&self) -> Option<&A::Error> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl<A> Debug for CommandOutcome<A>
where
    A: Aggregate,
    A::Error: Debug,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed { command, reason } => f
                .debug_struct("Failed")
                .field("command", command)
                .field("reason", reason)
                .finish(),
            Self::Noop { command } => f.debug_struct("Noop").field("command", command).finish(),
            Self::Succeeded { command, events } => f
                .debug_struct("Succeeded")
                .field("command", command)
                .field("events", events)
                .finish(),
        }
    }
}

/// The CommandHandler is responsible for coupling an [`Aggregate`] with an [`EventStore`]: it
/// rebuilds the state of a stream from its events, lets the aggregate decide, and appends the
/// decided events conditioned on the version it read.
///
/// The basic APIs are:
/// 1. handle
/// 2. load
/// 3. fetch_current_state
///
/// A write conflict is returned as is, re-reading and retrying is up to the caller.
pub struct CommandHandler<E>
where
    E: EventStore,
{
    event_store: E,
}

impl<E> CommandHandler<E>
where
    E: EventStore + Sync,
{
    /// Creates a new instance of a [`CommandHandler`].
    pub fn new(event_store: E) -> Self {
        Self { event_store }
    }

    /// Decides the command against the current state of its stream, and appends the resulting
    /// events if any.
    pub async fn handle(
        &self,
        command: <E::Aggregate as Aggregate>::Command,
    ) -> Result<CommandOutcome<E::Aggregate>, E::Error> {
        let stream_id = crate::command::Command::stream_id(&command).clone();
        let VersionedState { state, version } = self.load(&stream_id).await?;

        let events = match <E::Aggregate as Aggregate>::decide(&command, &state) {
            Err(reason) => {
                tracing::debug!(stream_id = %stream_id, version, reason = %reason, "command rejected");
                return Ok(CommandOutcome::Failed { command, reason });
            }
            Ok(events) if events.is_empty() => {
                tracing::debug!(stream_id = %stream_id, version, "command already satisfied");
                return Ok(CommandOutcome::Noop { command });
            }
            Ok(events) => events,
        };

        tracing::debug!(stream_id = %stream_id, version, events = events.len(), "command accepted");

        let Appended { events, .. } = self.event_store.append(&stream_id, events, version).await?;

        Ok(CommandOutcome::Succeeded { command, events })
    }

    /// Rebuilds the state of a stream along with its version, by applying its events in order.
    pub async fn load(
        &self,
        stream_id: &<E::Aggregate as Aggregate>::StreamId,
    ) -> Result<VersionedState<<E::Aggregate as Aggregate>::State>, E::Error> {
        let store_events = self.event_store.read(stream_id).await?;

        Ok(<E::Aggregate as Aggregate>::replay(
            store_events.iter().map(StoreEvent::payload),
        ))
    }

    /// Current state of a stream. A stream with no events yields the aggregate's empty state.
    pub async fn fetch_current_state(
        &self,
        stream_id: &<E::Aggregate as Aggregate>::StreamId,
    ) -> Result<<E::Aggregate as Aggregate>::State, E::Error> {
        Ok(self.load(stream_id).await?.state)
    }

    /// Returns the internal event store
    pub fn event_store(&self) -> &E {
        &self.event_store
    }
}
