use std::marker::PhantomData;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};

pub use config::RedisEventBusConfig;
pub use error::RedisEventBusError;

use crate::bus::EventBus;
use crate::codec::{EventCodec, JsonCodec};
use crate::event::Discriminated;
use crate::store::StoreEvent;
use crate::Aggregate;

mod config;
mod error;

/// [`EventBus`] publishing every event on a Redis pub/sub channel, encoded the same way the
/// durable stores persist it.
///
/// Pub/sub is fire and forget: subscribers that are not connected miss the event.
pub struct RedisEventBus<A>
where
    A: Aggregate,
{
    connection: MultiplexedConnection,
    channel: String,
    codec: JsonCodec<A::Event>,
    error_handler: Box<dyn Fn(RedisEventBusError) + Send + Sync>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A> RedisEventBus<A>
where
    A: Aggregate,
    A::Event: Discriminated,
{
    pub async fn new(config: RedisEventBusConfig<'_>) -> Result<RedisEventBus<A>, RedisEventBusError> {
        let client: Client = Client::open(config.url)?;

        Ok(Self {
            connection: client.get_multiplexed_async_connection().await?,
            channel: config.channel.unwrap_or(A::NAME).to_string(),
            codec: JsonCodec::new(),
            error_handler: config.error_handler,
            _aggregate: PhantomData,
        })
    }
}

#[async_trait]
impl<A> EventBus<A> for RedisEventBus<A>
where
    A: Aggregate,
    A::Event: Discriminated,
{
    async fn publish(&self, store_event: &StoreEvent<A::Event>) {
        if let Err(error) = publish(self, store_event).await {
            tracing::error!(event_id = %store_event.id, error = ?error, "redis event bus failed to publish event");
            (self.error_handler)(error)
        }
    }
}

async fn publish<A>(event_bus: &RedisEventBus<A>, store_event: &StoreEvent<A::Event>) -> Result<(), RedisEventBusError>
where
    A: Aggregate,
    A::Event: Discriminated,
{
    let payload: String = event_bus.codec.serialize(store_event)?;
    let mut connection = event_bus.connection.clone();

    let _receivers: i64 = connection.publish(event_bus.channel.as_str(), payload).await?;

    Ok(())
}
