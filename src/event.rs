use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::StreamId;

/// An immutable fact recording a change that has already been decided. Events are the only
/// durable representation of an aggregate and are never rewritten once appended.
pub trait Event: Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static {
    type StreamId: StreamId;

    /// The stream this event belongs to.
    fn stream_id(&self) -> &Self::StreamId;
}

/// Implemented by event families that carry a discriminator tag in their serialized form.
///
/// The discriminator is what a codec reads first when decoding, so every variant of the family
/// must be listed in [`Discriminated::DISCRIMINATORS`].
pub trait Discriminated {
    /// Every discriminator the family can produce.
    const DISCRIMINATORS: &'static [&'static str];

    /// The discriminator of this variant.
    fn discriminator(&self) -> &'static str;
}
