use sqlx::{Pool, Postgres};
use uuid::Uuid;

use heimdall_es::project::{BuildId, Project, ProjectCommand, ProjectEvent, ProjectId, ProjectState};
use heimdall_es::store::postgres::{PgStore, PgStoreBuilder};
use heimdall_es::store::{EventStore, StoreEvent};
use heimdall_es::{Aggregate, CommandHandler};

use crate::aggregate::{StaleStore, TestAggregate, TestCommand, TestEvent};

#[sqlx::test]
async fn setup_database_test(pool: Pool<Postgres>) {
    let table_name: String = format!("{}_events", TestAggregate::NAME);

    let rows = sqlx::query("SELECT table_name FROM information_schema.columns WHERE table_name = $1")
        .bind(table_name.as_str())
        .fetch_all(&pool)
        .await
        .unwrap();

    assert!(rows.is_empty());

    let store: PgStore<TestAggregate> = PgStoreBuilder::new(pool.clone())
        .try_build()
        .await
        .expect("Failed to create PgStore");

    assert_eq!(store.table_name(), table_name);

    let rows = sqlx::query("SELECT indexname FROM pg_indexes WHERE tablename = $1")
        .bind(table_name.as_str())
        .fetch_all(&pool)
        .await
        .unwrap();

    // primary key, stream_id, stream_id-sequence_number
    assert_eq!(rows.len(), 3);
}

#[sqlx::test]
async fn without_migrations_no_table_is_created(pool: Pool<Postgres>) {
    let _: PgStore<TestAggregate> = PgStoreBuilder::new(pool.clone())
        .without_running_migrations()
        .try_build()
        .await
        .unwrap();

    let rows = sqlx::query("SELECT table_name FROM information_schema.columns WHERE table_name = $1")
        .bind(format!("{}_events", TestAggregate::NAME))
        .fetch_all(&pool)
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[sqlx::test]
async fn append_and_read_test(pool: Pool<Postgres>) {
    let store: PgStore<TestAggregate> = PgStoreBuilder::new(pool).try_build().await.unwrap();
    let id: Uuid = Uuid::new_v4();

    assert!(store.read(&id).await.unwrap().is_empty());
    assert_eq!(store.version(&id).await.unwrap(), 0);

    let appended = store
        .append(
            &id,
            vec![TestEvent::Added { id, amount: 1 }, TestEvent::Added { id, amount: 2 }],
            0,
        )
        .await
        .unwrap();

    assert_eq!(appended.version, 2);

    let store_events: Vec<StoreEvent<TestEvent>> = store.read(&id).await.unwrap();
    // Every field, timestamp included, comes back as it was appended.
    assert_eq!(store_events, appended.events);
    // Sequence numbers starts from 1 and not from 0.
    assert_eq!(store_events[0].sequence_number, 1);
    assert_eq!(store.version(&id).await.unwrap(), 2);

    let other: Uuid = Uuid::new_v4();
    assert!(store.read(&other).await.unwrap().is_empty());
}

#[sqlx::test]
async fn stale_append_is_a_conflict_test(pool: Pool<Postgres>) {
    let store: PgStore<TestAggregate> = PgStoreBuilder::new(pool).try_build().await.unwrap();
    let id: Uuid = Uuid::new_v4();

    let _ = store
        .append(&id, vec![TestEvent::Added { id, amount: 1 }], 0)
        .await
        .unwrap();

    let error = store
        .append(&id, vec![TestEvent::Added { id, amount: 1 }], 0)
        .await
        .unwrap_err();

    assert!(error.is_conflict());
    assert_eq!(store.read(&id).await.unwrap().len(), 1);
}

#[sqlx::test]
async fn stale_handler_conflicts_on_postgres_test(pool: Pool<Postgres>) {
    let store: PgStore<TestAggregate> = PgStoreBuilder::new(pool).try_build().await.unwrap();
    let id: Uuid = Uuid::new_v4();

    let stale = CommandHandler::new(StaleStore::capture(store.clone(), &id).await.unwrap());
    let fresh = CommandHandler::new(store.clone());

    assert!(fresh
        .handle(TestCommand::Add { id, amount: 1 })
        .await
        .unwrap()
        .is_succeeded());

    let result = stale.handle(TestCommand::Add { id, amount: 1 }).await;
    assert!(matches!(result, Err(error) if error.is_conflict()));
}

#[sqlx::test]
async fn project_lifecycle_on_postgres_test(pool: Pool<Postgres>) {
    let store: PgStore<Project> = PgStoreBuilder::new(pool).try_build().await.unwrap();
    let handler = CommandHandler::new(store);
    let id: ProjectId = ProjectId::from_name("Heimdall");

    for command in [
        ProjectCommand::create_named("Heimdall").unwrap(),
        ProjectCommand::attach_build(id, BuildId::new("1.0.0").unwrap()),
        ProjectCommand::attach_build(id, BuildId::new("2.0.0").unwrap()),
    ] {
        assert!(handler.handle(command).await.unwrap().is_succeeded());
    }

    let versioned = handler.load(&id).await.unwrap();
    assert_eq!(versioned.version, 3);
    assert!(matches!(versioned.state, ProjectState::Alive { ref deliveries, .. } if deliveries.len() == 2));

    let payloads: Vec<ProjectEvent> = handler
        .event_store()
        .read(&id)
        .await
        .unwrap()
        .into_iter()
        .map(|store_event| store_event.payload)
        .collect();
    assert!(matches!(payloads[0], ProjectEvent::ProjectCreated { .. }));
}
