//! Owned snapshot of a session for UI layers.
use serde::{Deserialize, Serialize};

use crate::creature::Creature;
use crate::encounter::GameFlags;
use crate::event_log::EventLogEntry;
use crate::save::Trainer;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub revision: u64,
    pub trainer: Trainer,
    pub current_pokemon: Option<Creature>,
    pub failure_count: u8,
    pub flags: GameFlags,
    pub find_pending: bool,
    pub unique_pokemon_count: usize,
    pub total_captured_count: usize,
    pub captured_pokemon: Vec<Creature>,
    pub event_log: Vec<EventLogEntry>,
}
