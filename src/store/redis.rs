use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, Script};
use typed_builder::TypedBuilder;

use crate::codec::{EventCodec, JsonCodec};
use crate::event::Discriminated;
use crate::store::{Appended, EventStore, StoreError, StoreEvent};
use crate::types::{SequenceNumber, StreamKey};
use crate::Aggregate;

// Appends ARGV[2..] to the list only when its length still equals ARGV[1].
// Replies {applied, length of the list}.
const APPEND_SCRIPT: &str = r"
local len = redis.call('LLEN', KEYS[1])
if len ~= tonumber(ARGV[1]) then
  return {0, len}
end
for i = 2, #ARGV do
  len = redis.call('RPUSH', KEYS[1], ARGV[i])
end
return {1, len}
";

#[derive(TypedBuilder)]
pub struct RedisStoreConfig<'a> {
    /// Connection url of the Redis server, e.g. `redis://127.0.0.1:6379`.
    pub(crate) url: &'a str,
    /// Namespace prepended to every stream key.
    #[builder(default = "heimdall:")]
    pub(crate) key_prefix: &'a str,
}

/// Durable [`EventStore`] keeping each stream in a Redis list, one serialized event per entry.
///
/// Appends go through a Lua script, so the length check and the push happen atomically on the
/// server side.
pub struct RedisStore<A, C = JsonCodec<<A as Aggregate>::Event>>
where
    A: Aggregate,
{
    connection: MultiplexedConnection,
    key_prefix: String,
    codec: C,
    append_script: Script,
    _aggregate: std::marker::PhantomData<fn() -> A>,
}

impl<A> RedisStore<A>
where
    A: Aggregate,
    A::Event: Discriminated,
{
    /// Connects to Redis, encoding events as JSON.
    pub async fn new(config: RedisStoreConfig<'_>) -> Result<Self, StoreError> {
        Self::with_codec(config, JsonCodec::new()).await
    }
}

impl<A, C> RedisStore<A, C>
where
    A: Aggregate,
    C: EventCodec<A::Event>,
{
    pub async fn with_codec(config: RedisStoreConfig<'_>, codec: C) -> Result<Self, StoreError> {
        let client: Client = Client::open(config.url)?;
        let connection: MultiplexedConnection = client.get_multiplexed_async_connection().await?;

        Ok(Self {
            connection,
            key_prefix: config.key_prefix.to_string(),
            codec,
            append_script: Script::new(APPEND_SCRIPT),
            _aggregate: std::marker::PhantomData,
        })
    }

    /// Redis key of the list holding the given stream.
    pub fn key(&self, stream_id: &A::StreamId) -> String {
        format!("{}{}", self.key_prefix, StreamKey::new::<A>(stream_id))
    }
}

#[async_trait]
impl<A, C> EventStore for RedisStore<A, C>
where
    A: Aggregate,
    C: EventCodec<A::Event>,
{
    type Aggregate = A;
    type Error = StoreError;

    async fn read(&self, stream_id: &A::StreamId) -> Result<Vec<StoreEvent<A::Event>>, Self::Error> {
        let mut connection = self.connection.clone();
        let entries: Vec<String> = connection.lrange(self.key(stream_id), 0, -1).await?;

        entries
            .iter()
            .map(|entry| self.codec.deserialize(entry).map_err(StoreError::from))
            .collect()
    }

    #[tracing::instrument(skip_all, fields(stream_id = %stream_id), err)]
    async fn append(
        &self,
        stream_id: &A::StreamId,
        events: Vec<A::Event>,
        expected_version: SequenceNumber,
    ) -> Result<Appended<A::Event>, Self::Error> {
        let store_events: Vec<StoreEvent<A::Event>> = StoreEvent::stamp(events, expected_version);
        let entries: Vec<String> = store_events
            .iter()
            .map(|store_event| self.codec.serialize(store_event))
            .collect::<Result<_, _>>()?;

        let key: String = self.key(stream_id);
        let mut invocation = self.append_script.key(&key);
        invocation.arg(expected_version);
        for entry in &entries {
            invocation.arg(entry);
        }

        let mut connection = self.connection.clone();
        let (applied, version): (i32, SequenceNumber) = invocation.invoke_async(&mut connection).await?;

        if applied == 0 {
            tracing::warn!(stream = %key, expected_version, actual = version, "stale append rejected");
            return Err(StoreError::Conflict {
                stream: StreamKey::new::<A>(stream_id),
                expected: expected_version,
                actual: version,
            });
        }

        Ok(Appended {
            version,
            events: store_events,
        })
    }
}
