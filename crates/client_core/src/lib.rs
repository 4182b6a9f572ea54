//! Reconciles backend-pushed events into the frontend's state stores.

pub mod backend;
pub mod dedup;
pub mod dispatcher;
pub mod error;
mod handlers;
pub mod listener;
pub mod setup;
pub mod state;
pub mod store;

pub use backend::{BackendCommands, MissingBackend, NoopBackend};
pub use dispatcher::{DispatchOutcome, DispatchStats, EventDispatcher};
pub use error::{ChannelError, CommandError, DispatchError, ListenerError};
pub use listener::{
    backend_event_channel, event_channel, spawn_listener, EventEmitter, EventSubscription,
    ListenerHandle, ListenerOptions,
};
pub use store::{AppStores, Store, StoreSubscription, StoresSnapshot};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
