use async_trait::async_trait;

use crate::bus::EventBus;
use crate::store::{Appended, EventStore, StoreEvent};
use crate::types::SequenceNumber;
use crate::Aggregate;

/// Decorator forwarding every successfully appended event to a set of [`EventBus`]es.
///
/// Publishing happens after the append, and the buses swallow their own failures: a bus that
/// cannot publish never undoes nor fails an append. Delivery is at-least-once at best.
pub struct NotifyingStore<S>
where
    S: EventStore,
{
    inner: S,
    event_buses: Vec<Box<dyn EventBus<S::Aggregate> + Send>>,
}

impl<S> NotifyingStore<S>
where
    S: EventStore,
{
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            event_buses: vec![],
        }
    }

    /// Set event buses list
    pub fn with_event_buses(mut self, event_buses: Vec<Box<dyn EventBus<S::Aggregate> + Send>>) -> Self {
        self.event_buses = event_buses;
        self
    }

    /// Add a single event bus
    pub fn add_event_bus(mut self, event_bus: impl EventBus<S::Aggregate> + Send + 'static) -> Self {
        self.event_buses.push(Box::new(event_bus));
        self
    }

    /// Returns the decorated store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Publish events on every configured bus. Buses run concurrently, events keep their order
    /// within each bus.
    pub async fn publish(&self, store_events: &[StoreEvent<<S::Aggregate as Aggregate>::Event>]) {
        let futures: Vec<_> = self
            .event_buses
            .iter()
            .map(|bus| async move {
                for store_event in store_events {
                    bus.publish(store_event).await;
                }
            })
            .collect();

        let _ = futures::future::join_all(futures).await;
    }
}

#[async_trait]
impl<S> EventStore for NotifyingStore<S>
where
    S: EventStore + Send + Sync,
{
    type Aggregate = S::Aggregate;
    type Error = S::Error;

    async fn read(
        &self,
        stream_id: &<S::Aggregate as Aggregate>::StreamId,
    ) -> Result<Vec<StoreEvent<<S::Aggregate as Aggregate>::Event>>, Self::Error> {
        self.inner.read(stream_id).await
    }

    async fn append(
        &self,
        stream_id: &<S::Aggregate as Aggregate>::StreamId,
        events: Vec<<S::Aggregate as Aggregate>::Event>,
        expected_version: SequenceNumber,
    ) -> Result<Appended<<S::Aggregate as Aggregate>::Event>, Self::Error> {
        let appended = self.inner.append(stream_id, events, expected_version).await?;

        tracing::debug!(
            stream_id = %stream_id,
            events = appended.events.len(),
            buses = self.event_buses.len(),
            "publishing appended events"
        );
        self.publish(&appended.events).await;

        Ok(appended)
    }
}
