//! Outbound command surface of the native backend.

use async_trait::async_trait;
use tracing::debug;

use crate::error::CommandError;

#[async_trait]
pub trait BackendCommands: Send + Sync {
    /// Tells the backend the frontend is subscribed and ready for events.
    async fn frontend_ready(&self) -> Result<(), CommandError>;
    async fn confirm_exchange_id(&self, exchange_id: &str) -> Result<(), CommandError>;
    async fn refresh_transactions(&self) -> Result<(), CommandError>;
}

/// Backend stand-in for headless replays; accepts every command.
pub struct NoopBackend;

#[async_trait]
impl BackendCommands for NoopBackend {
    async fn frontend_ready(&self) -> Result<(), CommandError> {
        debug!(command = "frontend_ready", "noop backend accepted command");
        Ok(())
    }

    async fn confirm_exchange_id(&self, exchange_id: &str) -> Result<(), CommandError> {
        debug!(
            command = "confirm_exchange_id",
            exchange_id, "noop backend accepted command"
        );
        Ok(())
    }

    async fn refresh_transactions(&self) -> Result<(), CommandError> {
        debug!(command = "refresh_transactions", "noop backend accepted command");
        Ok(())
    }
}

/// Backend that is not running; every command fails.
pub struct MissingBackend;

#[async_trait]
impl BackendCommands for MissingBackend {
    async fn frontend_ready(&self) -> Result<(), CommandError> {
        Err(CommandError::Unavailable {
            command: "frontend_ready",
            reason: "backend process not attached".into(),
        })
    }

    async fn confirm_exchange_id(&self, _exchange_id: &str) -> Result<(), CommandError> {
        Err(CommandError::Unavailable {
            command: "confirm_exchange_id",
            reason: "backend process not attached".into(),
        })
    }

    async fn refresh_transactions(&self) -> Result<(), CommandError> {
        Err(CommandError::Unavailable {
            command: "refresh_transactions",
            reason: "backend process not attached".into(),
        })
    }
}
