//! Scripted play-through of a session.
use anyhow::{Result, anyhow};
use pokecatch_game::{
    CaptureCollection, Clock, CreatureProvider, GameSession, KeyValueStore, LoginOutcome,
    RollSource, ThrowOutcome,
};
use serde::Serialize;
use std::time::Instant;

use crate::driver::SessionDriver;

#[derive(Debug, Clone, Copy, Default)]
pub struct AutoplayPolicy {
    /// Walk away from creatures the trainer already owns.
    pub skip_duplicates: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AutoplayStats {
    pub searches: usize,
    pub failed_searches: usize,
    pub throws: usize,
    pub caught: usize,
    pub fled: usize,
    pub ignored: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DexLine {
    pub id: u16,
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutoplayReport {
    pub trainer: String,
    pub restored: bool,
    pub stats: AutoplayStats,
    pub unique_pokemon: usize,
    pub total_captured: usize,
    pub dex: Vec<DexLine>,
    /// Event-log messages written during this run, login greeting first.
    pub log: Vec<String>,
    pub elapsed_ms: u128,
}

/// One line per distinct creature id, in id order.
#[must_use]
pub fn dex_lines(collection: &CaptureCollection) -> Vec<DexLine> {
    collection
        .tally()
        .into_iter()
        .map(|(id, count)| DexLine {
            id,
            name: collection
                .iter()
                .find(|c| c.id == id)
                .map(|c| c.display_name())
                .unwrap_or_default(),
            count,
        })
        .collect()
}

/// Log in as `trainer`, run `encounters` searches, then quit.
pub async fn run_autoplay<P, S, R, C>(
    mut session: GameSession<P, S, R, C>,
    trainer: &str,
    encounters: usize,
    policy: AutoplayPolicy,
) -> Result<AutoplayReport>
where
    P: CreatureProvider + Clone + Send + Sync + 'static,
    S: KeyValueStore + Send + 'static,
    R: RollSource + Send + 'static,
    C: Clock + Send + 'static,
{
    let started = Instant::now();
    let login = session
        .set_trainer_name(trainer)
        .map_err(|e| anyhow!("cannot log in as {trainer:?}: {e}"))?;
    let log_start = session.event_log().len().saturating_sub(1);
    log::info!("{trainer} logged in ({login:?})");

    let mut driver = SessionDriver::new(session);
    let shared = driver.session();
    let mut stats = AutoplayStats::default();

    for round in 0..encounters {
        stats.searches += 1;
        if !driver.find().await {
            stats.failed_searches += 1;
            log::debug!("round {round}: search failed");
            continue;
        }

        if policy.skip_duplicates {
            let owned = {
                let guard = shared.lock().await;
                guard
                    .current_creature()
                    .is_some_and(|c| guard.captured().contains_id(c.id))
            };
            if owned && driver.ignore().await {
                stats.ignored += 1;
                continue;
            }
        }

        loop {
            match driver.throw().await {
                ThrowOutcome::Caught => {
                    stats.throws += 1;
                    stats.caught += 1;
                    break;
                }
                ThrowOutcome::BrokeFree => stats.throws += 1,
                ThrowOutcome::Fleeing(_) => {
                    stats.throws += 1;
                    stats.fled += 1;
                    driver.settle().await;
                    break;
                }
                ThrowOutcome::NotAllowed => break,
            }
        }
    }

    let mut session = shared.lock().await;
    session.quit();

    Ok(AutoplayReport {
        trainer: session.trainer().name.clone(),
        restored: login == LoginOutcome::Restored,
        stats,
        unique_pokemon: session.unique_creature_count(),
        total_captured: session.total_captured_count(),
        dex: dex_lines(session.captured()),
        log: session
            .event_log()
            .messages()
            .skip(log_start)
            .map(str::to_string)
            .collect(),
        elapsed_ms: started.elapsed().as_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pokecatch_game::{
        FixedClock, MemoryStore, SaveRecord, ScriptedRolls, SessionConfig, StaticProvider,
    };

    fn session(
        store: &MemoryStore,
        rolls: ScriptedRolls,
    ) -> GameSession<StaticProvider, MemoryStore, ScriptedRolls, FixedClock> {
        GameSession::with_parts(
            StaticProvider::kanto_sample(),
            store.clone(),
            rolls,
            FixedClock(Utc.with_ymd_and_hms(2025, 2, 2, 10, 0, 0).unwrap()),
            SessionConfig {
                flee_delay_ms: 5,
                ..SessionConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn autoplay_counts_every_outcome() {
        let store = MemoryStore::new();
        // 1: caught, 150: not in table, 4: flees, 1: caught again
        let rolls = ScriptedRolls::new()
            .with_ids([1, 150, 4, 1])
            .with_throws([0.9, 0.1, 0.2, 0.6]);
        let report = run_autoplay(
            session(&store, rolls),
            "Ash",
            4,
            AutoplayPolicy::default(),
        )
        .await
        .unwrap();

        assert!(!report.restored);
        assert_eq!(
            report.stats,
            AutoplayStats {
                searches: 4,
                failed_searches: 1,
                throws: 4,
                caught: 2,
                fled: 1,
                ignored: 0,
            }
        );
        assert_eq!(report.unique_pokemon, 1);
        assert_eq!(report.total_captured, 2);
        assert_eq!(
            report.dex,
            vec![DexLine {
                id: 1,
                name: "Bulbasaur".to_string(),
                count: 2
            }]
        );
        assert_eq!(report.log[0], "Welcome, Ash! Get to catching!");
        assert!(report.log.iter().any(|m| m == "Charmander ran away!"));

        let raw = store.get("save:Ash").unwrap().expect("save present");
        let saved = SaveRecord::from_json(&raw).unwrap();
        assert_eq!(saved.captured_pokemon.total_count(), 2);
    }

    #[tokio::test]
    async fn skip_duplicates_ignores_owned_creatures() {
        let store = MemoryStore::new();
        let rolls = ScriptedRolls::new().with_ids([25, 25]).with_throws([0.9]);
        let report = run_autoplay(
            session(&store, rolls),
            "Misty",
            2,
            AutoplayPolicy {
                skip_duplicates: true,
            },
        )
        .await
        .unwrap();
        assert_eq!(report.stats.caught, 1);
        assert_eq!(report.stats.ignored, 1);
        assert_eq!(
            report.log.last().map(String::as_str),
            Some("You ignored Pikachu :(")
        );
    }

    #[tokio::test]
    async fn second_run_restores_and_reports_new_messages_only() {
        let store = MemoryStore::new();
        run_autoplay(
            session(&store, ScriptedRolls::new().with_ids([7]).with_throws([0.9])),
            "Brock",
            1,
            AutoplayPolicy::default(),
        )
        .await
        .unwrap();

        let report = run_autoplay(
            session(&store, ScriptedRolls::new()),
            "Brock",
            0,
            AutoplayPolicy::default(),
        )
        .await
        .unwrap();
        assert!(report.restored);
        assert_eq!(report.total_captured, 1);
        assert_eq!(report.log, vec!["Welcome back, Brock!".to_string()]);
    }

    #[tokio::test]
    async fn blank_trainer_is_an_error() {
        let store = MemoryStore::new();
        let result = run_autoplay(
            session(&store, ScriptedRolls::new()),
            "",
            1,
            AutoplayPolicy::default(),
        )
        .await;
        assert!(result.is_err());
    }
}
