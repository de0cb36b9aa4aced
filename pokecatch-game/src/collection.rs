//! The trainer's capture collection.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::creature::Creature;

/// Append-only list of captured creatures in capture order. Duplicate ids
/// are kept as separate captures.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureCollection(Vec<Creature>);

impl CaptureCollection {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub(crate) fn record(&mut self, creature: Creature) {
        self.0.push(creature);
    }

    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.0.iter().map(|c| c.id).collect::<HashSet<_>>().len()
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains_id(&self, id: u16) -> bool {
        self.0.iter().any(|c| c.id == id)
    }

    /// Captures per creature id, ordered by id.
    #[must_use]
    pub fn tally(&self) -> BTreeMap<u16, usize> {
        let mut counts = BTreeMap::new();
        for creature in &self.0 {
            *counts.entry(creature.id).or_insert(0) += 1;
        }
        counts
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Creature> {
        self.0.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Creature] {
        &self.0
    }
}

impl From<Vec<Creature>> for CaptureCollection {
    fn from(creatures: Vec<Creature>) -> Self {
        Self(creatures)
    }
}

impl<'a> IntoIterator for &'a CaptureCollection {
    type Item = &'a Creature;
    type IntoIter = std::slice::Iter<'a, Creature>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
