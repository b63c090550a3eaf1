use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::store::{Appended, EventStore, StoreError, StoreEvent};
use crate::types::{SequenceNumber, StreamKey};
use crate::Aggregate;

/// Volatile [`EventStore`] keeping every stream in process memory. Mostly meant for tests.
///
/// Streams are keyed by [`StreamKey`], so the aggregate name takes part in the key just like it
/// does in the durable stores.
pub struct InMemoryStore<A>
where
    A: Aggregate,
{
    streams: RwLock<HashMap<StreamKey, Vec<StoreEvent<A::Event>>>>,
}

impl<A> InMemoryStore<A>
where
    A: Aggregate,
{
    pub fn new() -> Self {
        Self {
            streams: RwLock::new(HashMap::new()),
        }
    }

    /// Number of streams holding at least one event.
    pub async fn len(&self) -> usize {
        self.streams.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.streams.read().await.is_empty()
    }
}

impl<A> Default for InMemoryStore<A>
where
    A: Aggregate,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<A> EventStore for InMemoryStore<A>
where
    A: Aggregate,
{
    type Aggregate = A;
    type Error = StoreError;

    async fn read(&self, stream_id: &A::StreamId) -> Result<Vec<StoreEvent<A::Event>>, Self::Error> {
        let streams = self.streams.read().await;

        Ok(streams
            .get(&StreamKey::new::<A>(stream_id))
            .cloned()
            .unwrap_or_default())
    }

    #[tracing::instrument(skip_all, fields(stream_id = %stream_id), err)]
    async fn append(
        &self,
        stream_id: &A::StreamId,
        events: Vec<A::Event>,
        expected_version: SequenceNumber,
    ) -> Result<Appended<A::Event>, Self::Error> {
        let key: StreamKey = StreamKey::new::<A>(stream_id);
        // The version check and the push must happen under the same write guard.
        let mut streams = self.streams.write().await;

        let actual: SequenceNumber = streams
            .get(&key)
            .map_or(0, |stream| stream.len() as SequenceNumber);

        if actual != expected_version {
            tracing::warn!(stream = %key, expected_version, actual, "stale append rejected");
            return Err(StoreError::Conflict {
                stream: key,
                expected: expected_version,
                actual,
            });
        }

        let store_events: Vec<StoreEvent<A::Event>> = StoreEvent::stamp(events, expected_version);
        let stream = streams.entry(key).or_default();
        stream.extend(store_events.iter().cloned());

        Ok(Appended {
            version: stream.len() as SequenceNumber,
            events: store_events,
        })
    }
}
