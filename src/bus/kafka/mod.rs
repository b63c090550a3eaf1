use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::ClientConfig;

pub use config::{KafkaEventBusConfig, Security};
pub use error::KafkaEventBusError;

use crate::bus::EventBus;
use crate::codec::{EventCodec, JsonCodec};
use crate::event::Discriminated;
use crate::store::StoreEvent;
use crate::Aggregate;

mod config;
mod error;

/// The [`KafkaEventBus`] provides an implementation of the `EventBus` trait for publishing events
/// using Apache Kafka as the underlying messaging system.
///
/// Records are keyed by stream id, so the events of a stream land on one partition, in order.
pub struct KafkaEventBus<A>
where
    A: Aggregate,
{
    producer: FutureProducer,
    topic: String,
    request_timeout: Duration,
    codec: JsonCodec<A::Event>,
    error_handler: Box<dyn Fn(KafkaEventBusError) + Send + Sync>,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A> KafkaEventBus<A>
where
    A: Aggregate,
    A::Event: Discriminated,
{
    pub async fn new(config: KafkaEventBusConfig<'_>) -> Result<KafkaEventBus<A>, KafkaEventBusError> {
        let mut client_config: ClientConfig = config.client_config.unwrap_or_default();
        client_config
            .set("metadata.broker.list", config.broker_url_list)
            .set("request.timeout.ms", config.request_timeout.to_string());

        if let Some(security) = config.security {
            client_config
                .set("security.protocol", "SASL_SSL")
                .set("sasl.mechanisms", security.sasl_mechanism)
                .set("sasl.username", security.username)
                .set("sasl.password", security.password);
        }

        Ok(Self {
            producer: client_config.create()?,
            topic: config.topic.to_string(),
            request_timeout: Duration::from_millis(config.request_timeout),
            codec: JsonCodec::new(),
            error_handler: config.error_handler,
            _aggregate: PhantomData,
        })
    }
}

#[async_trait]
impl<A> EventBus<A> for KafkaEventBus<A>
where
    A: Aggregate,
    A::Event: Discriminated,
{
    async fn publish(&self, store_event: &StoreEvent<A::Event>) {
        if let Err(error) = publish(self, store_event).await {
            tracing::error!(event_id = %store_event.id, error = ?error, "kafka event bus failed to publish event");
            (self.error_handler)(error)
        }
    }
}

async fn publish<A>(event_bus: &KafkaEventBus<A>, store_event: &StoreEvent<A::Event>) -> Result<(), KafkaEventBusError>
where
    A: Aggregate,
    A::Event: Discriminated,
{
    let key: String = store_event.stream_id().to_string();
    let payload: String = event_bus.codec.serialize(store_event)?;

    let _ = event_bus
        .producer
        .send(
            FutureRecord::<String, String>::to(event_bus.topic.as_str())
                .key(&key)
                .payload(&payload),
            event_bus.request_timeout,
        )
        .await
        .map_err(|(error, _)| error)?;

    Ok(())
}
