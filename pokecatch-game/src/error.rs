//! Error types surfaced by the core crate.
//!
//! Most failures never leave [`crate::GameSession`]: provider and parse
//! failures are absorbed into the event log. These types exist for the seams
//! and for callers that want to observe a failed save explicitly.

use thiserror::Error;

/// Any non-success outcome from a [`crate::CreatureProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("provider returned status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("malformed creature record: {0}")]
    Malformed(String),
}

/// Failure while writing a save record.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("cannot persist without a trainer name")]
    NoTrainer,
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Store(String),
}

/// Rejected session actions. Illegal encounter actions are silent no-ops and
/// never produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("trainer name must not be empty")]
    EmptyTrainerName,
}

/// Invalid [`crate::SessionConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
