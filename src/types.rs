use std::fmt::{Debug, Display, Formatter};
use std::hash::Hash;

use crate::Aggregate;

/// Position of an event within its stream. The first event of a stream has sequence number 1, so
/// the version of a stream is the sequence number of its last event, or 0 when it is empty.
pub type SequenceNumber = i32;

/// Opaque address of a stream. Anything cheap to clone, comparable and printable qualifies.
pub trait StreamId: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

impl<T> StreamId for T where T: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static {}

/// Storage key of a stream, derived from the aggregate name and the stream id.
///
/// The same pair always renders the same key, so every backend can use it to address the stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StreamKey(String);

impl StreamKey {
    pub fn new<A>(stream_id: &A::StreamId) -> Self
    where
        A: Aggregate,
    {
        Self(format!("{}:{}", A::NAME, stream_id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for StreamKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
