use chrono::{TimeZone, Utc};
use futures::executor::block_on;
use pokecatch_game::{
    Clock, CreatureRecord, FixedClock, GameFlags, GameSession, LoginOutcome, MemoryStore,
    ProviderError, ScriptedRolls, SeededRolls, SessionConfig, StaticProvider, ThrowOutcome,
};
use std::cell::Cell;

/// Advances one second per reading.
struct TickingClock {
    next: Cell<i64>,
}

impl TickingClock {
    fn starting_at(secs: i64) -> Self {
        Self {
            next: Cell::new(secs),
        }
    }
}

impl Clock for TickingClock {
    fn now(&self) -> chrono::DateTime<Utc> {
        let secs = self.next.get();
        self.next.set(secs + 1);
        Utc.timestamp_opt(secs, 0).unwrap()
    }
}

fn fixed_clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2025, 1, 1, 8, 30, 0).unwrap())
}

#[test]
fn seeded_finds_draw_ids_in_range() {
    let provider = StaticProvider::kanto_sample().synthesize_missing();
    let mut session = GameSession::with_parts(
        provider.clone(),
        MemoryStore::new(),
        SeededRolls::new(0xBEEF),
        fixed_clock(),
        SessionConfig::default(),
    );
    session.set_trainer_name("Red").unwrap();

    for _ in 0..200 {
        assert!(block_on(session.find_creature()));
        let creature = session.current_creature().expect("encounter active");
        assert!((1..=151).contains(&creature.id));
        assert_eq!(session.failure_count(), 0);
        assert!(session.ignore());
    }
    assert_eq!(provider.calls(), 200);
}

#[test]
fn scripted_throw_rolls_decide_outcome() {
    let mut session = GameSession::with_parts(
        StaticProvider::kanto_sample(),
        MemoryStore::new(),
        ScriptedRolls::new().with_ids([1, 4]).with_throws([0.5, 0.2]),
        fixed_clock(),
        SessionConfig::default(),
    );
    session.set_trainer_name("Red").unwrap();

    block_on(session.find_creature());
    assert_eq!(session.throw_at(), ThrowOutcome::Caught);

    block_on(session.find_creature());
    assert_eq!(session.throw_at(), ThrowOutcome::BrokeFree);
    assert_eq!(session.total_captured_count(), 1);
}

#[test]
fn full_flee_sequence_logs_in_order() {
    let mut session = GameSession::with_parts(
        StaticProvider::kanto_sample(),
        MemoryStore::new(),
        ScriptedRolls::new().with_ids([54]).with_throws([0.3, 0.0]),
        TickingClock::starting_at(1_700_000_000),
        SessionConfig::default(),
    );
    session.set_trainer_name("Misty").unwrap();
    block_on(session.find_creature());
    assert_eq!(session.throw_at(), ThrowOutcome::BrokeFree);
    let ThrowOutcome::Fleeing(ticket) = session.throw_at() else {
        panic!("second failure should flee");
    };

    let during = session.flags();
    assert!(during.is_running_away);
    assert!(!during.can_find);
    assert!(!block_on(session.find_creature()), "no search while fleeing");

    assert!(session.complete_flee(ticket));
    assert_eq!(session.flags(), GameFlags::IDLE);
    assert_eq!(session.failure_count(), 0);

    let log: Vec<&str> = session.event_log().messages().collect();
    assert_eq!(
        log,
        vec![
            "Welcome, Misty! Get to catching!",
            "A Psyduck has appeared!",
            "Misty throws a ball at Psyduck!",
            "Psyduck broke free!",
            "Misty throws a ball at Psyduck!",
            "Psyduck ran away!",
        ]
    );
    let ids: Vec<i64> = session.event_log().iter().map(|e| e.id).collect();
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn custom_flee_threshold_is_honored() {
    let config = SessionConfig {
        flee_after_failures: 3,
        flee_delay_ms: 250,
        ..SessionConfig::default()
    };
    let mut session = GameSession::with_parts(
        StaticProvider::kanto_sample(),
        MemoryStore::new(),
        ScriptedRolls::new().with_ids([19]).with_throws([0.1, 0.1, 0.1]),
        fixed_clock(),
        config,
    );
    block_on(session.find_creature());
    assert_eq!(session.throw_at(), ThrowOutcome::BrokeFree);
    assert_eq!(session.throw_at(), ThrowOutcome::BrokeFree);
    match session.throw_at() {
        ThrowOutcome::Fleeing(ticket) => {
            assert_eq!(ticket.delay, std::time::Duration::from_millis(250));
        }
        other => panic!("expected flee, got {other:?}"),
    }
}

#[test]
fn duplicate_captures_count_once_for_unique() {
    let mut session = GameSession::with_parts(
        StaticProvider::kanto_sample(),
        MemoryStore::new(),
        ScriptedRolls::new()
            .with_ids([1, 1, 4])
            .with_throws([0.9, 0.9, 0.9]),
        fixed_clock(),
        SessionConfig::default(),
    );
    session.set_trainer_name("Blue").unwrap();
    for _ in 0..3 {
        block_on(session.find_creature());
        assert_eq!(session.throw_at(), ThrowOutcome::Caught);
    }
    assert_eq!(session.unique_creature_count(), 2);
    assert_eq!(session.total_captured_count(), 3);
    let tally: Vec<(u16, usize)> = session.captured().tally().into_iter().collect();
    assert_eq!(tally, vec![(1, 2), (4, 1)]);
}

#[test]
fn captured_copy_is_independent_of_encounter() {
    let mut session = GameSession::with_parts(
        StaticProvider::kanto_sample(),
        MemoryStore::new(),
        ScriptedRolls::new().with_ids([133, 133]).with_throws([0.9]),
        fixed_clock(),
        SessionConfig::default(),
    );
    block_on(session.find_creature());
    session.throw_at();
    block_on(session.find_creature());
    let captured = session.captured().iter().next().unwrap().clone();
    assert_eq!(Some(&captured), session.current_creature());
    assert!(session.ignore());
    assert_eq!(session.captured().iter().next(), Some(&captured));
}

struct BrokenProvider;

#[async_trait::async_trait]
impl pokecatch_game::CreatureProvider for BrokenProvider {
    async fn fetch_by_id(&self, id: u16) -> Result<CreatureRecord, ProviderError> {
        if id % 2 == 0 {
            Err(ProviderError::Transport("connection reset".to_string()))
        } else {
            Ok(CreatureRecord {
                id,
                name: String::new(),
                sprite_url: None,
                types: Vec::new(),
                height: 0,
                weight: 0,
                stats: Vec::new(),
            })
        }
    }
}

#[test]
fn transport_and_shape_failures_both_log_retry_message() {
    let mut session = GameSession::with_parts(
        BrokenProvider,
        MemoryStore::new(),
        ScriptedRolls::new().with_ids([2, 3]),
        fixed_clock(),
        SessionConfig::default(),
    );
    session.set_trainer_name("Ash").unwrap();
    assert!(!block_on(session.find_creature()));
    assert!(!block_on(session.find_creature()));
    let failures = session
        .event_log()
        .messages()
        .filter(|m| *m == "Failed to find a Pokemon. Try again!")
        .count();
    assert_eq!(failures, 2);
    assert!(session.encounter().is_idle());
}

#[test]
fn relogin_as_other_trainer_swaps_saves() {
    let store = MemoryStore::new();
    let mut session = GameSession::with_parts(
        StaticProvider::kanto_sample(),
        store.clone(),
        ScriptedRolls::new().with_ids([25]).with_throws([0.8]),
        fixed_clock(),
        SessionConfig::default(),
    );
    assert_eq!(session.set_trainer_name("Ash"), Ok(LoginOutcome::NewTrainer));
    block_on(session.find_creature());
    session.throw_at();

    assert_eq!(
        session.set_trainer_name("Gary"),
        Ok(LoginOutcome::NewTrainer)
    );
    assert_eq!(session.trainer().name, "Gary");
    assert_eq!(session.total_captured_count(), 0);
    assert_eq!(session.event_log().len(), 1);

    assert_eq!(session.set_trainer_name("Ash"), Ok(LoginOutcome::Restored));
    assert_eq!(session.total_captured_count(), 1);
    assert_eq!(
        store.keys(),
        vec!["save:Ash".to_string(), "save:Gary".to_string()]
    );
}
