//! Offline [`CreatureProvider`] backed by a fixed table.
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::CreatureProvider;
use crate::creature::{CreatureRecord, StatEntry};
use crate::error::ProviderError;

const STAT_NAMES: [&str; 6] = [
    "hp",
    "attack",
    "defense",
    "special-attack",
    "special-defense",
    "speed",
];

// id, name, types, height, weight, base stats in STAT_NAMES order
type SampleRow = (u16, &'static str, &'static [&'static str], u32, u32, [u32; 6]);

const KANTO_SAMPLE: [SampleRow; 12] = [
    (1, "bulbasaur", &["grass", "poison"], 7, 69, [45, 49, 49, 65, 65, 45]),
    (4, "charmander", &["fire"], 6, 85, [39, 52, 43, 60, 50, 65]),
    (7, "squirtle", &["water"], 5, 90, [44, 48, 65, 50, 64, 43]),
    (16, "pidgey", &["normal", "flying"], 3, 18, [40, 45, 40, 35, 35, 56]),
    (19, "rattata", &["normal"], 3, 35, [30, 56, 35, 25, 35, 72]),
    (25, "pikachu", &["electric"], 4, 60, [35, 55, 40, 50, 50, 90]),
    (39, "jigglypuff", &["normal", "fairy"], 5, 55, [115, 45, 20, 45, 25, 20]),
    (52, "meowth", &["normal"], 4, 42, [40, 45, 35, 40, 40, 90]),
    (54, "psyduck", &["water"], 8, 196, [50, 52, 48, 65, 50, 55]),
    (94, "gengar", &["ghost", "poison"], 15, 405, [60, 65, 60, 130, 75, 110]),
    (133, "eevee", &["normal"], 3, 65, [55, 55, 50, 45, 65, 55]),
    (143, "snorlax", &["normal"], 21, 4600, [160, 110, 65, 65, 110, 30]),
];

/// Serves records from memory. Unknown ids answer `404` unless synthesized
/// records were requested.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    records: BTreeMap<u16, CreatureRecord>,
    synthesize_missing: bool,
    calls: Arc<AtomicUsize>,
}

impl StaticProvider {
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = CreatureRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.id, r)).collect(),
            synthesize_missing: false,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A dozen well-known Kanto creatures.
    #[must_use]
    pub fn kanto_sample() -> Self {
        Self::new(KANTO_SAMPLE.iter().map(sample_record))
    }

    /// Answer every id, inventing a plain record when the table has none.
    #[must_use]
    pub fn synthesize_missing(mut self) -> Self {
        self.synthesize_missing = true;
        self
    }

    /// Number of fetches served so far, shared across clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn lookup(&self, id: u16) -> Result<CreatureRecord, ProviderError> {
        if let Some(record) = self.records.get(&id) {
            return Ok(record.clone());
        }
        if self.synthesize_missing && id > 0 {
            return Ok(synthesized_record(id));
        }
        Err(ProviderError::Status(404))
    }
}

#[async_trait]
impl CreatureProvider for StaticProvider {
    async fn fetch_by_id(&self, id: u16) -> Result<CreatureRecord, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(id)
    }
}

fn stat_entries(values: [u32; 6]) -> Vec<StatEntry> {
    STAT_NAMES
        .iter()
        .zip(values)
        .map(|(name, base_value)| StatEntry {
            name: (*name).to_string(),
            base_value,
        })
        .collect()
}

fn sample_record(row: &SampleRow) -> CreatureRecord {
    let (id, name, types, height, weight, stats) = *row;
    CreatureRecord {
        id,
        name: name.to_string(),
        sprite_url: None,
        types: types.iter().map(|t| (*t).to_string()).collect(),
        height,
        weight,
        stats: stat_entries(stats),
    }
}

fn synthesized_record(id: u16) -> CreatureRecord {
    let base = 30 + u32::from(id % 70);
    CreatureRecord {
        id,
        name: format!("specimen-{id:03}"),
        sprite_url: None,
        types: vec!["normal".to_string()],
        height: 1 + u32::from(id % 20),
        weight: 10 + u32::from(id) * 3,
        stats: stat_entries([base; 6]),
    }
}
