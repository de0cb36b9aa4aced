//! Persisted record format and key derivation.
use serde::{Deserialize, Serialize};

use crate::collection::CaptureCollection;
use crate::constants::SAVE_KEY_PREFIX;
use crate::event_log::EventLog;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trainer {
    pub name: String,
    #[serde(default)]
    pub is_logged_in: bool,
}

impl Trainer {
    #[must_use]
    pub fn logged_in(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_logged_in: true,
        }
    }
}

/// Everything written under a trainer's save key. Encounter state is
/// deliberately absent: a restored session always starts idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    pub trainer: Trainer,
    #[serde(default)]
    pub captured_pokemon: CaptureCollection,
    #[serde(default)]
    pub event_log: EventLog,
}

impl SaveRecord {
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a save record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// The one addressing scheme for saves. Trainers sharing a name share a save.
#[must_use]
pub fn save_key(trainer_name: &str) -> String {
    format!("{SAVE_KEY_PREFIX}{trainer_name}")
}
