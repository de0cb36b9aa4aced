//! Random draws used by the session.
//!
//! Every random decision goes through [`RollSource`] so tests can replay
//! exact values.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::VecDeque;

pub trait RollSource {
    /// Uniform creature id in `min..=max`. Callers pass `min <= max`.
    fn creature_id(&mut self, min: u16, max: u16) -> u16;
    /// Uniform throw roll in `[0, 1)`.
    fn throw_roll(&mut self) -> f64;
}

/// `ChaCha20`-backed rolls, reproducible from a seed.
#[derive(Debug, Clone)]
pub struct SeededRolls {
    rng: ChaCha20Rng,
}

impl SeededRolls {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha20Rng::from_entropy(),
        }
    }
}

impl RollSource for SeededRolls {
    fn creature_id(&mut self, min: u16, max: u16) -> u16 {
        self.rng.gen_range(min..=max)
    }

    fn throw_roll(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }
}

/// Replays queued values. When a queue runs dry the fallback is used: the
/// lowest id, and a roll of `0.5` (a catch under the stock threshold).
#[derive(Debug, Clone, Default)]
pub struct ScriptedRolls {
    ids: VecDeque<u16>,
    throws: VecDeque<f64>,
}

impl ScriptedRolls {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ids(mut self, ids: impl IntoIterator<Item = u16>) -> Self {
        self.ids.extend(ids);
        self
    }

    #[must_use]
    pub fn with_throws(mut self, throws: impl IntoIterator<Item = f64>) -> Self {
        self.throws.extend(throws);
        self
    }

    pub fn push_throw(&mut self, roll: f64) {
        self.throws.push_back(roll);
    }

    pub fn push_id(&mut self, id: u16) {
        self.ids.push_back(id);
    }
}

impl RollSource for ScriptedRolls {
    fn creature_id(&mut self, min: u16, max: u16) -> u16 {
        self.ids.pop_front().map_or(min, |id| id.min(max).max(min))
    }

    fn throw_roll(&mut self) -> f64 {
        self.throws.pop_front().unwrap_or(0.5)
    }
}
