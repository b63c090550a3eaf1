use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Transaction};

use crate::codec::{EventCodec, JsonCodec};
use crate::sql::statements::Statements;
use crate::store::{Appended, EventStore, StoreError, StoreEvent};
use crate::types::{SequenceNumber, StreamKey};
use crate::Aggregate;

/// Postgres implementation of the [`EventStore`]. Each aggregate gets its own `{name}_events`
/// table, and each row holds one event encoded by the store codec.
///
/// A unique constraint on `(stream_id, sequence_number)` backs the version check, so two writers
/// racing on the same stream cannot both append.
///
/// The store is protected by an [`Arc`] that allows it to be cloneable still having the same memory
/// reference.
pub struct PgStore<A, C = JsonCodec<<A as Aggregate>::Event>>
where
    A: Aggregate,
{
    pub(super) inner: Arc<InnerPgStore<C>>,
    pub(super) _aggregate: PhantomData<fn() -> A>,
}

pub(super) struct InnerPgStore<C> {
    pub(super) pool: Pool<Postgres>,
    pub(super) statements: Statements,
    pub(super) codec: C,
}

impl<A, C> PgStore<A, C>
where
    A: Aggregate,
    C: EventCodec<A::Event>,
{
    /// Returns the name of the event store table
    pub fn table_name(&self) -> &str {
        self.inner.statements.table_name()
    }

    /// Current version of a stream, 0 when it has no event.
    pub async fn version(&self, stream_id: &A::StreamId) -> Result<SequenceNumber, StoreError> {
        Ok(sqlx::query_scalar::<_, SequenceNumber>(self.inner.statements.version())
            .bind(stream_id.to_string())
            .fetch_one(&self.inner.pool)
            .await?)
    }

    fn conflict(stream_id: &A::StreamId, expected: SequenceNumber, actual: SequenceNumber) -> StoreError {
        tracing::warn!(stream_id = %stream_id, expected, actual, "stale append rejected");
        StoreError::Conflict {
            stream: StreamKey::new::<A>(stream_id),
            expected,
            actual,
        }
    }
}

#[async_trait]
impl<A, C> EventStore for PgStore<A, C>
where
    A: Aggregate,
    C: EventCodec<A::Event>,
{
    type Aggregate = A;
    type Error = StoreError;

    async fn read(&self, stream_id: &A::StreamId) -> Result<Vec<StoreEvent<A::Event>>, Self::Error> {
        sqlx::query_scalar::<_, String>(self.inner.statements.by_stream_id())
            .bind(stream_id.to_string())
            .fetch_all(&self.inner.pool)
            .await?
            .iter()
            .map(|payload| self.inner.codec.deserialize(payload).map_err(StoreError::from))
            .collect()
    }

    // Note: https://github.com/rust-lang/rust-clippy/issues/12281
    #[allow(clippy::blocks_in_conditions)]
    #[tracing::instrument(skip_all, fields(stream_id = %stream_id), err)]
    async fn append(
        &self,
        stream_id: &A::StreamId,
        events: Vec<A::Event>,
        expected_version: SequenceNumber,
    ) -> Result<Appended<A::Event>, Self::Error> {
        let store_events: Vec<StoreEvent<A::Event>> = StoreEvent::stamp(events, expected_version);
        let stream: String = stream_id.to_string();

        let mut transaction: Transaction<Postgres> = self.inner.pool.begin().await?;

        let actual: SequenceNumber = sqlx::query_scalar::<_, SequenceNumber>(self.inner.statements.version())
            .bind(&stream)
            .fetch_one(&mut *transaction)
            .await?;

        // Dropping the transaction rolls it back.
        if actual != expected_version {
            return Err(Self::conflict(stream_id, expected_version, actual));
        }

        for store_event in &store_events {
            let payload: String = self.inner.codec.serialize(store_event)?;

            let inserted = sqlx::query(self.inner.statements.insert())
                .bind(store_event.id)
                .bind(&stream)
                .bind(payload)
                .bind(store_event.occurred_on)
                .bind(store_event.sequence_number)
                .execute(&mut *transaction)
                .await;

            match inserted {
                Ok(_) => (),
                // A concurrent writer committed the same sequence number first.
                Err(sqlx::Error::Database(error)) if error.is_unique_violation() => {
                    drop(transaction);
                    let actual: SequenceNumber = self.version(stream_id).await?;
                    return Err(Self::conflict(stream_id, expected_version, actual));
                }
                Err(error) => return Err(error.into()),
            }
        }

        transaction.commit().await?;

        Ok(Appended {
            version: expected_version + store_events.len() as SequenceNumber,
            events: store_events,
        })
    }
}

/// Debug implementation for [`PgStore`]. It just shows the statements, that are the only thing
/// that might be useful to debug.
impl<A, C> std::fmt::Debug for PgStore<A, C>
where
    A: Aggregate,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgStore")
            .field("statements", &self.inner.statements)
            .finish()
    }
}

impl<A, C> Clone for PgStore<A, C>
where
    A: Aggregate,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _aggregate: PhantomData,
        }
    }
}
