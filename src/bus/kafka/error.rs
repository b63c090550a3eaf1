use rdkafka::error::KafkaError;

use crate::codec::CodecError;

/// Failures of a [`super::KafkaEventBus`]. They never reach the store, only the bus error handler.
#[derive(thiserror::Error, Debug)]
pub enum KafkaEventBusError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Kafka(#[from] KafkaError),
}
