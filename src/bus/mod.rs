use async_trait::async_trait;

use crate::store::StoreEvent;
use crate::Aggregate;

#[cfg(feature = "kafka")]
pub mod kafka;
#[cfg(feature = "redis")]
pub mod redis;

/// Downstream publication of appended events.
///
/// Buses are not called by the stores themselves: wrap a store in a
/// [`NotifyingStore`](crate::store::NotifyingStore) and it publishes every event of a successful
/// append, in stream order, on each of its buses.
#[async_trait]
pub trait EventBus<A>: Sync
where
    A: Aggregate,
{
    /// Publish an event that was already appended to its stream.
    ///
    /// The append cannot be undone at this point, so failures are handled from within the bus
    /// (logged, handed to an error handler) and never panic nor propagate.
    async fn publish(&self, store_event: &StoreEvent<A::Event>);
}
