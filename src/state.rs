use std::fmt::Debug;

use crate::types::{SequenceNumber, StreamId};

/// A snapshot derived by folding a stream's events. States are never persisted.
pub trait State: Clone + Debug + Send + Sync {
    type StreamId: StreamId;

    /// The stream this state was folded from. Empty states return a sentinel id.
    fn stream_id(&self) -> &Self::StreamId;
}

/// A state paired with the number of events folded to obtain it.
///
/// The version is what an append is conditioned on: if the stream moved past it in the
/// meantime, the read was stale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionedState<S> {
    pub state: S,
    pub version: SequenceNumber,
}

impl<S> VersionedState<S> {
    /// A state that no event has been folded into yet.
    pub fn new(state: S) -> Self {
        Self { state, version: 0 }
    }

    pub(crate) fn incr_version(mut self) -> Self {
        self.version += 1;
        self
    }
}
