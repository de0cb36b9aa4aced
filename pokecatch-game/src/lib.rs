//! Pokecatch Game Engine
//!
//! Platform-agnostic encounter and capture logic. The crate owns the state
//! machine and the save format; creature data and storage are supplied by the
//! host through [`CreatureProvider`] and [`KeyValueStore`].

pub mod clock;
pub mod collection;
pub mod config;
pub mod constants;
pub mod creature;
pub mod encounter;
pub mod error;
pub mod event_log;
pub mod provider;
pub mod rolls;
pub mod save;
pub mod session;
pub mod store;
pub mod view;

use async_trait::async_trait;
use std::sync::Arc;

// Re-export commonly used types
pub use clock::{Clock, FixedClock, SystemClock};
pub use collection::CaptureCollection;
pub use config::SessionConfig;
pub use creature::{Creature, CreatureRecord, StatEntry, capitalize};
pub use encounter::{EncounterState, FindTicket, FleeTicket, GameFlags, ThrowOutcome};
pub use error::{ConfigError, ProviderError, SaveError, SessionError};
pub use event_log::{EventLog, EventLogEntry};
pub use provider::StaticProvider;
pub use rolls::{RollSource, ScriptedRolls, SeededRolls};
pub use save::{SaveRecord, Trainer, save_key};
pub use session::{GameSession, LoginOutcome};
pub use store::MemoryStore;
pub use view::SessionView;

/// Source of creature data, typically a remote API.
/// Platform-specific implementations should provide this
#[async_trait]
pub trait CreatureProvider {
    /// Fetch the creature with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error for any non-success outcome: bad status, transport
    /// failure or a body that does not describe a creature.
    async fn fetch_by_id(&self, id: u16) -> Result<CreatureRecord, ProviderError>;
}

#[async_trait]
impl<T> CreatureProvider for Arc<T>
where
    T: CreatureProvider + Send + Sync + ?Sized,
{
    async fn fetch_by_id(&self, id: u16) -> Result<CreatureRecord, ProviderError> {
        (**self).fetch_by_id(id).await
    }
}

/// Flat string key-value storage for saves.
/// Platform-specific implementations should provide this
pub trait KeyValueStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}
