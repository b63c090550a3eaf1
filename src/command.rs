use std::fmt::Debug;

use crate::types::StreamId;

/// An intent to change the state of exactly one stream.
pub trait Command: Debug + Send + Sync {
    type StreamId: StreamId;

    /// The stream targeted by this command.
    fn stream_id(&self) -> &Self::StreamId;
}
