use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use heimdall_es::bus::EventBus;
use heimdall_es::store::StoreEvent;
use heimdall_es::Aggregate;

/// Bus keeping every published event, shared with the test through an [`Arc`].
pub struct RecordingEventBus<A>
where
    A: Aggregate,
{
    published: Arc<Mutex<Vec<StoreEvent<A::Event>>>>,
}

impl<A> RecordingEventBus<A>
where
    A: Aggregate,
{
    pub fn new(published: Arc<Mutex<Vec<StoreEvent<A::Event>>>>) -> Self {
        Self { published }
    }
}

#[async_trait]
impl<A> EventBus<A> for RecordingEventBus<A>
where
    A: Aggregate,
{
    async fn publish(&self, store_event: &StoreEvent<A::Event>) {
        self.published.lock().unwrap().push(store_event.clone());
    }
}
