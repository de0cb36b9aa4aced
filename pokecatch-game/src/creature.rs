//! Creature data and the provider-boundary record schema.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ProviderError;

/// A creature as the game knows it. Captured entries are plain clones of the
/// encounter creature, never references to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creature {
    pub id: u16,
    pub name: String,
    #[serde(rename = "sprite", default)]
    pub sprite_url: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub stats: BTreeMap<String, u32>,
}

impl Creature {
    /// Name as shown in the event log.
    #[must_use]
    pub fn display_name(&self) -> String {
        capitalize(&self.name)
    }
}

/// One base stat as reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub name: String,
    pub base_value: u32,
}

/// What a [`crate::CreatureProvider`] hands back. Converted into a
/// [`Creature`] through `TryFrom`, which rejects records the game cannot use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: u16,
    pub name: String,
    pub sprite_url: Option<String>,
    pub types: Vec<String>,
    pub height: u32,
    pub weight: u32,
    pub stats: Vec<StatEntry>,
}

impl TryFrom<CreatureRecord> for Creature {
    type Error = ProviderError;

    fn try_from(record: CreatureRecord) -> Result<Self, Self::Error> {
        if record.id == 0 {
            return Err(ProviderError::Malformed("creature id is zero".to_string()));
        }
        if record.name.trim().is_empty() {
            return Err(ProviderError::Malformed(format!(
                "creature {} has no name",
                record.id
            )));
        }
        if record.types.iter().any(|t| t.trim().is_empty()) {
            return Err(ProviderError::Malformed(format!(
                "creature {} has an unnamed type",
                record.id
            )));
        }

        let mut stats = BTreeMap::new();
        for entry in record.stats {
            if entry.name.trim().is_empty() {
                return Err(ProviderError::Malformed(format!(
                    "creature {} has an unnamed stat",
                    record.id
                )));
            }
            stats.insert(entry.name, entry.base_value);
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            sprite_url: record.sprite_url.filter(|url| !url.is_empty()),
            types: record.types,
            height: record.height,
            weight: record.weight,
            stats,
        })
    }
}

/// Upper-case the first character and keep the remainder as-is.
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
