use redis::RedisError;

use crate::codec::CodecError;

/// Failures of a [`super::RedisEventBus`]. They never reach the store, only the bus error handler.
#[derive(thiserror::Error, Debug)]
pub enum RedisEventBusError {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Redis(#[from] RedisError),
}
