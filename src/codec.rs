//! Serialized representation of events, as seen by the durable stores.
//!
//! A codec turns a [`StoreEvent`] into a string and back. Decoding always reads the event
//! discriminator first and refuses tags it does not know, so a stream written by a newer revision
//! of an aggregate fails loudly instead of being decoded into the wrong variant.

use std::collections::HashSet;
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::event::{Discriminated, Event};
use crate::store::StoreEvent;
use crate::types::SequenceNumber;

/// Field holding the event discriminator in the serialized form.
pub const DISCRIMINATOR_FIELD: &str = "eventType";

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// Serialization/deserialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// The serialized event carries no discriminator.
    #[error("serialized event has no `{0}` discriminator")]
    MissingDiscriminator(&'static str),
    /// The discriminator is not part of the registered event family.
    #[error("unknown event discriminator `{0}`")]
    UnknownDiscriminator(String),
}

/// Serialize/deserialize contract every durable store relies on. Implementations must round-trip
/// every field of the [`StoreEvent`], timestamp included.
pub trait EventCodec<E>: Send + Sync {
    fn serialize(&self, store_event: &StoreEvent<E>) -> Result<String, CodecError>;

    fn deserialize(&self, data: &str) -> Result<StoreEvent<E>, CodecError>;
}

/// JSON [`EventCodec`].
///
/// The event fields are written flat next to the envelope metadata, so the event type must
/// serialize as a map carrying its discriminator under [`DISCRIMINATOR_FIELD`], e.g. an enum
/// annotated with `#[serde(tag = "eventType")]`.
///
/// ```json
/// {"eventId":"…","occurredOn":"…","sequenceNumber":1,"eventType":"ProjectCreated","id":"…","name":"Heimdall"}
/// ```
pub struct JsonCodec<E> {
    discriminators: HashSet<&'static str>,
    _event: PhantomData<fn() -> E>,
}

impl<E> JsonCodec<E>
where
    E: Event + Discriminated,
{
    /// Builds the codec, registering every discriminator of the event family.
    pub fn new() -> Self {
        Self {
            discriminators: E::DISCRIMINATORS.iter().copied().collect(),
            _event: PhantomData,
        }
    }

    pub fn knows(&self, discriminator: &str) -> bool {
        self.discriminators.contains(discriminator)
    }
}

impl<E> Default for JsonCodec<E>
where
    E: Event + Discriminated,
{
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeRef<'a, E> {
    event_id: Uuid,
    occurred_on: DateTime<Utc>,
    sequence_number: SequenceNumber,
    #[serde(flatten)]
    payload: &'a E,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<E> {
    event_id: Uuid,
    occurred_on: DateTime<Utc>,
    sequence_number: SequenceNumber,
    #[serde(flatten)]
    payload: E,
}

impl<E> EventCodec<E> for JsonCodec<E>
where
    E: Event + Discriminated,
{
    fn serialize(&self, store_event: &StoreEvent<E>) -> Result<String, CodecError> {
        let discriminator: &'static str = store_event.payload.discriminator();
        // Refuse to write what could not be read back.
        if !self.knows(discriminator) {
            return Err(CodecError::UnknownDiscriminator(discriminator.to_string()));
        }

        Ok(serde_json::to_string(&EnvelopeRef {
            event_id: store_event.id,
            occurred_on: store_event.occurred_on,
            sequence_number: store_event.sequence_number,
            payload: &store_event.payload,
        })?)
    }

    fn deserialize(&self, data: &str) -> Result<StoreEvent<E>, CodecError> {
        let value: Value = serde_json::from_str(data)?;

        match value.get(DISCRIMINATOR_FIELD).and_then(Value::as_str) {
            None => return Err(CodecError::MissingDiscriminator(DISCRIMINATOR_FIELD)),
            Some(discriminator) if !self.knows(discriminator) => {
                return Err(CodecError::UnknownDiscriminator(discriminator.to_string()))
            }
            Some(_) => (),
        }

        let envelope: Envelope<E> = decode(value)?;

        Ok(StoreEvent {
            id: envelope.event_id,
            payload: envelope.payload,
            occurred_on: envelope.occurred_on,
            sequence_number: envelope.sequence_number,
        })
    }
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, CodecError> {
    Ok(serde_json::from_value(value)?)
}
