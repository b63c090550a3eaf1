use std::marker::PhantomData;
use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::codec::{EventCodec, JsonCodec};
use crate::event::Discriminated;
use crate::sql::migrations::{Migrations, MigrationsHandler};
use crate::sql::statements::Statements;
use crate::store::postgres::InnerPgStore;
use crate::Aggregate;

use super::PgStore;

/// Struct used to build a brand new [`PgStore`].
pub struct PgStoreBuilder<A, C = JsonCodec<<A as Aggregate>::Event>>
where
    A: Aggregate,
{
    pool: Pool<Postgres>,
    statements: Statements,
    codec: C,
    run_migrations: bool,
    _aggregate: PhantomData<fn() -> A>,
}

impl<A> PgStoreBuilder<A>
where
    A: Aggregate,
    A::Event: Discriminated,
{
    /// Creates a new instance of a [`PgStoreBuilder`], encoding events as JSON.
    pub fn new(pool: Pool<Postgres>) -> Self {
        PgStoreBuilder {
            pool,
            statements: Statements::new::<A>(),
            codec: JsonCodec::new(),
            run_migrations: true,
            _aggregate: PhantomData,
        }
    }
}

impl<A, C> PgStoreBuilder<A, C>
where
    A: Aggregate,
    C: EventCodec<A::Event>,
{
    /// Replaces the codec used to encode the payload column.
    pub fn with_codec<N>(self, codec: N) -> PgStoreBuilder<A, N>
    where
        N: EventCodec<A::Event>,
    {
        PgStoreBuilder {
            pool: self.pool,
            statements: self.statements,
            codec,
            run_migrations: self.run_migrations,
            _aggregate: PhantomData,
        }
    }

    /// Calling this function the caller avoid running migrations. It is recommend to run migrations
    /// at least once per store per startup.
    pub fn without_running_migrations(mut self) -> Self {
        self.run_migrations = false;
        self
    }

    /// This function runs all the needed [`Migrations`], atomically setting up the database if
    /// `run_migrations` isn't explicitly set to false. [`Migrations`] should be run only at application
    /// startup due to avoid performance issues.
    ///
    /// Eventually returns an instance of PgStore.
    ///
    /// # Errors
    ///
    /// Will return an `Err` if there's an error running [`Migrations`].
    pub async fn try_build(self) -> Result<PgStore<A, C>, sqlx::Error> {
        if self.run_migrations {
            Migrations::run::<A>(&self.pool).await?;
        }

        Ok(PgStore {
            inner: Arc::new(InnerPgStore {
                pool: self.pool,
                statements: self.statements,
                codec: self.codec,
            }),
            _aggregate: PhantomData,
        })
    }
}
