use std::ops::Deref;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::codec::CodecError;
use crate::types::{SequenceNumber, StreamKey};

pub use memory::InMemoryStore;
pub use notifying::NotifyingStore;

mod memory;
mod notifying;
#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "redis")]
pub mod redis;

/// An EventStore is responsible for appending the events an aggregate decided to its stream, and
/// for reading back a stream's history.
///
/// Appends are optimistic: the caller passes the version it observed when reading, and the store
/// refuses to append past events it has not seen.
#[async_trait]
pub trait EventStore {
    type Aggregate: crate::Aggregate;
    type Error: std::error::Error;

    /// Loads the events of a stream, oldest first. An empty or unknown stream yields no events.
    async fn read(
        &self,
        stream_id: &<Self::Aggregate as crate::Aggregate>::StreamId,
    ) -> Result<Vec<StoreEvent<<Self::Aggregate as crate::Aggregate>::Event>>, Self::Error>;

    /// Appends events to a stream, provided its current version is still `expected_version`.
    ///
    /// Either all the events are appended, or none are.
    async fn append(
        &self,
        stream_id: &<Self::Aggregate as crate::Aggregate>::StreamId,
        events: Vec<<Self::Aggregate as crate::Aggregate>::Event>,
        expected_version: SequenceNumber,
    ) -> Result<Appended<<Self::Aggregate as crate::Aggregate>::Event>, Self::Error>;
}

/// Blanket implementation making an [`EventStore`] every (smart) pointer to an [`EventStore`],
/// e.g. `&Store`, `Box<Store>`, `Arc<Store>`.
/// This is what lets a single store handle be shared by the command handler and the read side.
#[async_trait]
impl<A, E, T, S> EventStore for T
where
    A: crate::Aggregate,
    E: std::error::Error,
    S: EventStore<Aggregate = A, Error = E> + ?Sized + Sync,
    T: Deref<Target = S> + Sync,
{
    type Aggregate = A;
    type Error = E;

    /// Deref call to [`EventStore::read`].
    async fn read(&self, stream_id: &A::StreamId) -> Result<Vec<StoreEvent<A::Event>>, Self::Error> {
        self.deref().read(stream_id).await
    }

    /// Deref call to [`EventStore::append`].
    async fn append(
        &self,
        stream_id: &A::StreamId,
        events: Vec<A::Event>,
        expected_version: SequenceNumber,
    ) -> Result<Appended<A::Event>, Self::Error> {
        self.deref().append(stream_id, events, expected_version).await
    }
}

/// A `StoreEvent` contains the payload (the original event) alongside the event's metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEvent<Event> {
    /// Uniquely identifies an event among all events emitted from all aggregates.
    pub id: Uuid,
    /// The original, decided, event.
    pub payload: Event,
    /// The timestamp of when the event was appended.
    pub occurred_on: DateTime<Utc>,
    /// The sequence number of the event, within its stream.
    pub sequence_number: SequenceNumber,
}

impl<Event> StoreEvent<Event> {
    /// Wraps freshly decided events, numbering them right after `expected_version`.
    ///
    /// Timestamps are truncated to microseconds, the finest precision every backend persists.
    pub fn stamp(events: Vec<Event>, expected_version: SequenceNumber) -> Vec<Self> {
        let occurred_on: DateTime<Utc> = Utc::now().trunc_subsecs(6);

        events
            .into_iter()
            .zip(expected_version + 1..)
            .map(|(payload, sequence_number)| Self {
                id: Uuid::new_v4(),
                payload,
                occurred_on,
                sequence_number,
            })
            .collect()
    }

    /// Returns the sequence number of the event, within its stream.
    pub const fn sequence_number(&self) -> SequenceNumber {
        self.sequence_number
    }

    /// Returns the original, decided, event.
    pub const fn payload(&self) -> &Event {
        &self.payload
    }
}

impl<E> StoreEvent<E>
where
    E: crate::event::Event,
{
    /// The stream the event belongs to.
    pub fn stream_id(&self) -> &E::StreamId {
        self.payload.stream_id()
    }
}

/// Outcome of a successful append.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Appended<Event> {
    /// Version of the stream once the events were appended.
    pub version: SequenceNumber,
    /// The appended events, as they were persisted.
    pub events: Vec<StoreEvent<Event>>,
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// Another writer appended to the stream after it was read.
    #[error("stream `{stream}` is at version {actual} while version {expected} was expected")]
    Conflict {
        stream: StreamKey,
        expected: SequenceNumber,
        actual: SequenceNumber,
    },
    /// Serialization/deserialization error
    #[error(transparent)]
    Codec(#[from] CodecError),
    /// Redis error
    #[cfg(feature = "redis")]
    #[error(transparent)]
    Redis(#[from] ::redis::RedisError),
    /// Sql error
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
