pub use builder::*;
pub use event_store::*;

mod builder;
mod event_store;
