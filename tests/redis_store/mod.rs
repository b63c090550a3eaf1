use futures::StreamExt;
use uuid::Uuid;

use heimdall_es::bus::redis::{RedisEventBus, RedisEventBusConfig};
use heimdall_es::codec::{EventCodec, JsonCodec};
use heimdall_es::project::{BuildId, Project, ProjectCommand, ProjectId};
use heimdall_es::store::redis::{RedisStore, RedisStoreConfig};
use heimdall_es::store::{EventStore, InMemoryStore, NotifyingStore, StoreEvent};
use heimdall_es::CommandHandler;

use crate::aggregate::{TestAggregate, TestCommand, TestEvent};

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

async fn store<A>() -> RedisStore<A>
where
    A: heimdall_es::Aggregate,
    A::Event: heimdall_es::Discriminated,
{
    let url: String = redis_url();
    // Every test gets its own namespace so runs never see each other's streams.
    let prefix: String = format!("heimdall-test-{}:", Uuid::new_v4());

    let config = RedisStoreConfig::builder().url(url.as_str()).key_prefix(prefix.as_str()).build();

    RedisStore::new(config).await.unwrap()
}

#[tokio::test]
async fn redis_append_and_read_test() {
    let store: RedisStore<TestAggregate> = store().await;
    let id: Uuid = Uuid::new_v4();

    assert!(store.read(&id).await.unwrap().is_empty());

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
    assert_eq!(store_events, appended.events);
    assert!(store.key(&id).ends_with(&format!("counter:{}", id)));
}

#[tokio::test]
async fn redis_stale_append_is_a_conflict_test() {
    let store: RedisStore<TestAggregate> = store().await;
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

#[tokio::test]
async fn redis_project_lifecycle_test() {
    let handler = CommandHandler::new(store::<Project>().await);
    let id: ProjectId = ProjectId::from_name("Heimdall");

    let _ = handler
        .handle(ProjectCommand::create_named("Heimdall").unwrap())
        .await
        .unwrap();
    let _ = handler
        .handle(ProjectCommand::attach_build(id, BuildId::new("1.0.0").unwrap()))
        .await
        .unwrap();

    let noop = handler
        .handle(ProjectCommand::attach_build(id, BuildId::new("1.0.0").unwrap()))
        .await
        .unwrap();

    assert!(noop.is_noop());
    assert_eq!(handler.load(&id).await.unwrap().version, 2);
}

#[tokio::test]
async fn redis_event_bus_publishes_appended_events_test() {
    let url: String = redis_url();
    let channel: String = format!("heimdall-test-{}", Uuid::new_v4());

    let client = redis::Client::open(url.as_str()).unwrap();
    let mut pubsub = client.get_async_pubsub().await.unwrap();
    pubsub.subscribe(channel.as_str()).await.unwrap();

    let config = RedisEventBusConfig::builder()
        .url(url.as_str())
        .channel(channel.as_str())
        .error_handler(Box::new(|error| panic!("redis event bus failed: {:?}", error)))
        .build();
    let event_bus: RedisEventBus<TestAggregate> = RedisEventBus::new(config).await.unwrap();

    let store = NotifyingStore::new(InMemoryStore::<TestAggregate>::new()).add_event_bus(event_bus);
    let handler = CommandHandler::new(store);
    let id: Uuid = Uuid::new_v4();

    let outcome = handler.handle(TestCommand::Add { id, amount: 5 }).await.unwrap();
    assert_eq!(outcome.events().len(), 1);

    let message = pubsub.on_message().next().await.unwrap();
    assert_eq!(message.get_channel_name(), channel.as_str());

    let payload: String = message.get_payload().unwrap();
    let received: StoreEvent<TestEvent> = JsonCodec::<TestEvent>::new().deserialize(&payload).unwrap();

    assert_eq!(received, outcome.events()[0]);
}
