use crate::command::Command;
use crate::event::Event;
use crate::state::{State, VersionedState};
use crate::types::StreamId;

/// The Aggregate trait is responsible for deciding which events a command produces against the
/// current state, and for folding those events back into a state.
///
/// Both functions are pure: the aggregate itself is data-only and never touches a store. The
/// [`crate::CommandHandler`] is what couples an aggregate with an [`crate::store::EventStore`].
pub trait Aggregate: Sized + Send + Sync + 'static {
    /// Stable name of the aggregate type. Persisted stream keys and table names are derived from
    /// it, so changing it orphans existing streams.
    const NAME: &'static str;

    type StreamId: StreamId;
    type Command: Command<StreamId = Self::StreamId>;
    type State: State<StreamId = Self::StreamId>;
    type Event: Event<StreamId = Self::StreamId>;
    /// Reason a command gets rejected. Its `Display` is the human readable explanation.
    type Error: std::error::Error + Send + Sync;

    /// Decides the events a command produces against the given state.
    ///
    /// `Err` rejects the command. `Ok` with no events means the command is valid but already
    /// satisfied.
    fn decide(command: &Self::Command, state: &Self::State) -> Result<Vec<Self::Event>, Self::Error>;

    /// Folds an event into the state. Unknown state/event pairings must return the state unchanged.
    fn apply(state: Self::State, event: &Self::Event) -> Self::State;

    /// The state of a stream before any event.
    fn empty_state() -> Self::State;

    /// Rebuilds the state of a stream from its whole history, oldest event first.
    fn replay<'a, I>(events: I) -> VersionedState<Self::State>
    where
        I: IntoIterator<Item = &'a Self::Event>,
    {
        Self::replay_from(VersionedState::new(Self::empty_state()), events)
    }

    /// Continues a replay from an already folded state. The version grows by one per event,
    /// whatever its effect on the state.
    fn replay_from<'a, I>(versioned: VersionedState<Self::State>, events: I) -> VersionedState<Self::State>
    where
        I: IntoIterator<Item = &'a Self::Event>,
    {
        events.into_iter().fold(versioned, |acc, event| {
            let VersionedState { state, version } = acc.incr_version();
            VersionedState {
                state: Self::apply(state, event),
                version,
            }
        })
    }
}
