//! Encounter state machine types.
//!
//! [`EncounterState`] is the single source of truth; [`GameFlags`] is derived
//! from it on demand and never stored.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::creature::Creature;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EncounterState {
    #[default]
    Idle,
    Active {
        creature: Creature,
        failure_count: u8,
        fleeing: bool,
    },
}

impl EncounterState {
    #[must_use]
    pub const fn appeared(creature: Creature) -> Self {
        Self::Active {
            creature,
            failure_count: 0,
            fleeing: false,
        }
    }

    #[must_use]
    pub const fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn creature(&self) -> Option<&Creature> {
        match self {
            Self::Idle => None,
            Self::Active { creature, .. } => Some(creature),
        }
    }

    #[must_use]
    pub const fn failure_count(&self) -> u8 {
        match self {
            Self::Idle => 0,
            Self::Active { failure_count, .. } => *failure_count,
        }
    }

    #[must_use]
    pub const fn is_fleeing(&self) -> bool {
        matches!(self, Self::Active { fleeing: true, .. })
    }

    #[must_use]
    pub fn flags(&self) -> GameFlags {
        GameFlags::from(self)
    }
}

/// Which actions are currently legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFlags {
    pub can_find: bool,
    pub can_ignore: bool,
    pub can_throw: bool,
    pub is_running_away: bool,
}

impl GameFlags {
    pub const IDLE: Self = Self {
        can_find: true,
        can_ignore: false,
        can_throw: false,
        is_running_away: false,
    };
}

impl Default for GameFlags {
    fn default() -> Self {
        Self::IDLE
    }
}

impl From<&EncounterState> for GameFlags {
    fn from(state: &EncounterState) -> Self {
        match state {
            EncounterState::Idle => Self::IDLE,
            EncounterState::Active { fleeing: true, .. } => Self {
                can_find: false,
                can_ignore: false,
                can_throw: false,
                is_running_away: true,
            },
            EncounterState::Active { failure_count, .. } => Self {
                can_find: false,
                can_ignore: *failure_count == 0,
                can_throw: true,
                is_running_away: false,
            },
        }
    }
}

/// Handle for a pending flee. Completing it only has an effect while the
/// encounter it was issued for is still live and fleeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleeTicket {
    pub(crate) generation: u64,
    pub delay: Duration,
}

impl FleeTicket {
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Handle for an in-flight encounter search, issued by
/// [`crate::GameSession::begin_find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindTicket {
    pub(crate) sequence: u64,
    pub creature_id: u16,
}

/// Result of [`crate::GameSession::throw_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowOutcome {
    /// Throwing was not legal; nothing changed.
    NotAllowed,
    Caught,
    BrokeFree,
    /// The creature is running away; complete the ticket after its delay.
    Fleeing(FleeTicket),
}
