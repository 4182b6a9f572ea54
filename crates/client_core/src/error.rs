use shared::protocol::EventTag;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid {tag} payload: {source}")]
    InvalidPayload {
        tag: EventTag,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("backend unavailable for {command}: {reason}")]
    Unavailable {
        command: &'static str,
        reason: String,
    },
    #[error("backend rejected {command}: {message}")]
    Rejected {
        command: &'static str,
        message: String,
    },
    #[error("backend did not answer {command} within {timeout_ms}ms")]
    TimedOut { command: &'static str, timeout_ms: u64 },
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("event emitted on `{actual}` but this bridge listens on `{expected}`")]
    WrongChannel { expected: String, actual: String },
    #[error("event channel closed")]
    Closed,
}

#[derive(Debug, Error)]
pub enum ListenerError {
    #[error("listener task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
