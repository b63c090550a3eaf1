use rand::Rng;
use uuid::Uuid;

use heimdall_es::store::{EventStore, InMemoryStore, StoreError};
use heimdall_es::{Aggregate, CommandHandler, CommandOutcome};

use crate::aggregate::{StaleStore, TestAggregate, TestCommand, TestError, TestEvent, TestState};

fn random_history(id: Uuid, len: usize) -> Vec<TestEvent> {
    let mut rng = rand::thread_rng();

    (0..len)
        .map(|_| TestEvent::Added {
            id,
            amount: rng.gen_range(-100..100),
        })
        .collect()
}

#[test]
fn replay_version_is_the_number_of_events() {
    let id: Uuid = Uuid::new_v4();

    for len in [0, 1, 2, 17, 128] {
        let events = random_history(id, len);
        let versioned = TestAggregate::replay(&events);

        assert_eq!(versioned.version as usize, len);
    }
}

#[test]
fn replay_is_associative() {
    let id: Uuid = Uuid::new_v4();
    let mut rng = rand::thread_rng();

    for _ in 0..32 {
        let events = random_history(id, rng.gen_range(0..64));
        let split: usize = rng.gen_range(0..=events.len());
        let (head, tail) = events.split_at(split);

        let whole = TestAggregate::replay(&events);
        let resumed = TestAggregate::replay_from(TestAggregate::replay(head), tail);

        assert_eq!(whole, resumed);

        let folded: TestState = tail.iter().fold(TestAggregate::replay(head).state, TestAggregate::apply);
        assert_eq!(whole.state, folded);
    }
}

#[test]
fn decide_is_pure() {
    let id: Uuid = Uuid::new_v4();
    let state = TestAggregate::replay(&random_history(id, 8)).state;
    let command = TestCommand::AddTwice { id, amount: 3 };

    assert_eq!(
        TestAggregate::decide(&command, &state),
        TestAggregate::decide(&command, &state)
    );
}

#[tokio::test]
async fn succeeded_command_appends_stamped_events() {
    let handler = CommandHandler::new(InMemoryStore::<TestAggregate>::new());
    let id: Uuid = Uuid::new_v4();

    let _ = handler.handle(TestCommand::Add { id, amount: 2 }).await.unwrap();
    let outcome = handler.handle(TestCommand::AddTwice { id, amount: 5 }).await.unwrap();

    assert!(outcome.is_succeeded());
    let sequence_numbers: Vec<i32> = outcome.events().iter().map(|e| e.sequence_number).collect();
    assert_eq!(sequence_numbers, vec![2, 3]);

    let versioned = handler.load(&id).await.unwrap();
    assert_eq!(versioned.version, 3);
    assert_eq!(versioned.state, TestState { id, total: 12 });
}

#[tokio::test]
async fn failed_and_noop_commands_leave_the_store_untouched() {
    let handler = CommandHandler::new(InMemoryStore::<TestAggregate>::new());
    let id: Uuid = Uuid::new_v4();

    let outcome = handler.handle(TestCommand::Refuse { id }).await.unwrap();
    assert!(outcome.is_failed());
    assert_eq!(outcome.reason(), Some(&TestError));
    assert_eq!(outcome.reason().map(ToString::to_string).as_deref(), Some("refused"));

    let outcome = handler.handle(TestCommand::Nothing { id }).await.unwrap();
    assert!(matches!(outcome, CommandOutcome::Noop { .. }));
    assert!(outcome.events().is_empty());

    assert!(handler.event_store().read(&id).await.unwrap().is_empty());
    assert_eq!(handler.fetch_current_state(&id).await.unwrap(), TestState::default());
}

#[tokio::test]
async fn stale_handler_gets_a_conflict() {
    let store: InMemoryStore<TestAggregate> = InMemoryStore::new();
    let id: Uuid = Uuid::new_v4();

    let _ = CommandHandler::new(&store)
        .handle(TestCommand::Add { id, amount: 1 })
        .await
        .unwrap();

    // Both handlers observe version 1.
    let stale = CommandHandler::new(StaleStore::capture(&store, &id).await.unwrap());
    let fresh = CommandHandler::new(&store);

    let first = fresh.handle(TestCommand::Add { id, amount: 10 }).await.unwrap();
    assert!(first.is_succeeded());

    let second = stale.handle(TestCommand::Add { id, amount: 100 }).await;

    match second {
        Err(StoreError::Conflict { expected, actual, .. }) => {
            assert_eq!(expected, 1);
            assert_eq!(actual, 2);
        }
        other => panic!("expected a conflict, got {:?}", other),
    }

    let versioned = fresh.load(&id).await.unwrap();
    assert_eq!(versioned.version, 2);
    assert_eq!(versioned.state.total, 11);
}

#[tokio::test]
async fn concurrent_handlers_never_both_win_from_the_same_read() {
    let store: InMemoryStore<TestAggregate> = InMemoryStore::new();
    let id: Uuid = Uuid::new_v4();

    let handlers: Vec<_> = futures::future::join_all((0..8).map(|_| StaleStore::capture(&store, &id)))
        .await
        .into_iter()
        .map(|stale| CommandHandler::new(stale.unwrap()))
        .collect();

    let outcomes = futures::future::join_all(
        handlers
            .iter()
            .map(|handler| handler.handle(TestCommand::Add { id, amount: 1 })),
    )
    .await;

    let succeeded = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Err(error) if error.is_conflict()))
        .count();

    assert_eq!(succeeded, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.read(&id).await.unwrap().len(), 1);
}
