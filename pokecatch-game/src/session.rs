//! The game session: trainer identity, encounter state machine, capture
//! collection, event log and persistence.
use crate::clock::{Clock, SystemClock};
use crate::collection::CaptureCollection;
use crate::config::SessionConfig;
use crate::constants::{
    MSG_FIND_FAILED, msg_appeared, msg_broke_free, msg_caught, msg_ignored, msg_ran_away,
    msg_throw, msg_welcome, msg_welcome_back,
};
use crate::creature::{Creature, CreatureRecord};
use crate::encounter::{EncounterState, FindTicket, FleeTicket, GameFlags, ThrowOutcome};
use crate::error::{ProviderError, SaveError, SessionError};
use crate::event_log::EventLog;
use crate::rolls::{RollSource, SeededRolls};
use crate::save::{SaveRecord, Trainer, save_key};
use crate::view::SessionView;
use crate::{CreatureProvider, KeyValueStore};

/// How [`GameSession::set_trainer_name`] resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A save existed and was restored.
    Restored,
    /// No usable save; a fresh one was written.
    NewTrainer,
}

/// One player's game. Owns all mutable state; collaborators are injected.
#[derive(Debug)]
pub struct GameSession<P, S, R = SeededRolls, C = SystemClock> {
    provider: P,
    store: S,
    rolls: R,
    clock: C,
    config: SessionConfig,
    trainer: Trainer,
    encounter: EncounterState,
    captured: CaptureCollection,
    event_log: EventLog,
    /// Bumped whenever an encounter starts or ends.
    generation: u64,
    find_sequence: u64,
    pending_find: Option<u64>,
    pending_flee: Option<FleeTicket>,
    revision: u64,
}

impl<P, S> GameSession<P, S>
where
    P: CreatureProvider,
    S: KeyValueStore,
{
    /// Session with entropy-seeded rolls, the system clock and stock config.
    #[must_use]
    pub fn new(provider: P, store: S) -> Self {
        Self::with_parts(
            provider,
            store,
            SeededRolls::from_entropy(),
            SystemClock,
            SessionConfig::default(),
        )
    }
}

impl<P, S, R, C> GameSession<P, S, R, C>
where
    P: CreatureProvider,
    S: KeyValueStore,
    R: RollSource,
    C: Clock,
{
    #[must_use]
    pub fn with_parts(provider: P, store: S, rolls: R, clock: C, config: SessionConfig) -> Self {
        Self {
            provider,
            store,
            rolls,
            clock,
            config,
            trainer: Trainer::default(),
            encounter: EncounterState::Idle,
            captured: CaptureCollection::new(),
            event_log: EventLog::new(),
            generation: 0,
            find_sequence: 0,
            pending_find: None,
            pending_flee: None,
            revision: 0,
        }
    }

    // Queries ---------------------------------------------------------------

    #[must_use]
    pub const fn trainer(&self) -> &Trainer {
        &self.trainer
    }

    #[must_use]
    pub const fn encounter(&self) -> &EncounterState {
        &self.encounter
    }

    #[must_use]
    pub const fn current_creature(&self) -> Option<&Creature> {
        self.encounter.creature()
    }

    #[must_use]
    pub const fn failure_count(&self) -> u8 {
        self.encounter.failure_count()
    }

    #[must_use]
    pub const fn is_in_encounter(&self) -> bool {
        !self.encounter.is_idle()
    }

    #[must_use]
    pub fn flags(&self) -> GameFlags {
        self.encounter.flags()
    }

    #[must_use]
    pub const fn captured(&self) -> &CaptureCollection {
        &self.captured
    }

    #[must_use]
    pub fn unique_creature_count(&self) -> usize {
        self.captured.unique_count()
    }

    #[must_use]
    pub fn total_captured_count(&self) -> usize {
        self.captured.total_count()
    }

    #[must_use]
    pub const fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn is_find_pending(&self) -> bool {
        self.pending_find.is_some()
    }

    /// The flee waiting to be completed, if any.
    #[must_use]
    pub const fn pending_flee(&self) -> Option<FleeTicket> {
        self.pending_flee
    }

    /// Increments on every observable change.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            revision: self.revision,
            trainer: self.trainer.clone(),
            current_pokemon: self.current_creature().cloned(),
            failure_count: self.failure_count(),
            flags: self.flags(),
            find_pending: self.is_find_pending(),
            unique_pokemon_count: self.unique_creature_count(),
            total_captured_count: self.total_captured_count(),
            captured_pokemon: self.captured.as_slice().to_vec(),
            event_log: self.event_log.as_slice().to_vec(),
        }
    }

    // Trainer lifecycle -----------------------------------------------------

    /// Log in as `name`, restoring that trainer's save when one exists.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::EmptyTrainerName`] for a blank name; nothing
    /// is changed in that case. Surrounding whitespace is not part of the
    /// name.
    pub fn set_trainer_name(&mut self, name: &str) -> Result<LoginOutcome, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::EmptyTrainerName);
        }

        self.clear_event_log();
        self.trainer = Trainer::logged_in(name);
        self.touch();

        if self.restore(name) {
            return Ok(LoginOutcome::Restored);
        }

        self.captured = CaptureCollection::new();
        self.log_event(msg_welcome(name));
        self.persist_quietly();
        Ok(LoginOutcome::NewTrainer)
    }

    /// Append a message to the event log, stamped with the session clock.
    pub fn log_event(&mut self, message: impl Into<String>) {
        let now = self.clock.now();
        self.event_log.push(message, now);
        self.touch();
    }

    pub fn clear_event_log(&mut self) {
        self.event_log.clear();
        self.touch();
    }

    // Encounter lifecycle ---------------------------------------------------

    /// Search for a creature and start an encounter with it. Returns `true`
    /// when an encounter started. Provider failures end up in the event log.
    pub async fn find_creature(&mut self) -> bool {
        let Some(ticket) = self.begin_find() else {
            return false;
        };
        let result = self.provider.fetch_by_id(ticket.creature_id).await;
        self.finish_find(ticket, result)
    }

    /// First half of [`GameSession::find_creature`] for hosts that fetch
    /// outside the session. Draws the creature id and marks a search as in
    /// flight; returns `None` when finding is not legal or another search is
    /// already pending.
    pub fn begin_find(&mut self) -> Option<FindTicket> {
        if !self.flags().can_find || self.pending_find.is_some() {
            log::debug!("find ignored: encounter active or search pending");
            return None;
        }
        if let Err(err) = self.config.validate() {
            log::error!("find refused, session config is unusable: {err}");
            return None;
        }
        self.find_sequence += 1;
        self.pending_find = Some(self.find_sequence);
        let creature_id = self
            .rolls
            .creature_id(self.config.min_creature_id, self.config.max_creature_id);
        log::debug!("searching for creature #{creature_id}");
        self.touch();
        Some(FindTicket {
            sequence: self.find_sequence,
            creature_id,
        })
    }

    /// Second half of [`GameSession::find_creature`]. A ticket that is no
    /// longer the pending one is dropped without effect.
    pub fn finish_find(
        &mut self,
        ticket: FindTicket,
        result: Result<CreatureRecord, ProviderError>,
    ) -> bool {
        if self.pending_find != Some(ticket.sequence) {
            log::debug!("dropping stale find ticket {}", ticket.sequence);
            return false;
        }
        self.pending_find = None;
        self.touch();

        match result.and_then(Creature::try_from) {
            Ok(creature) if self.encounter.is_idle() => {
                let name = creature.display_name();
                self.set_encounter(EncounterState::appeared(creature));
                self.log_event(msg_appeared(&name));
                true
            }
            Ok(creature) => {
                log::debug!("discarding {} found while not idle", creature.name);
                false
            }
            Err(err) => {
                log::warn!("failed to fetch creature #{}: {err}", ticket.creature_id);
                self.log_event(MSG_FIND_FAILED);
                false
            }
        }
    }

    /// Walk away from the current creature. No-op unless ignoring is legal.
    pub fn ignore(&mut self) -> bool {
        if !self.flags().can_ignore {
            return false;
        }
        let Some(name) = self.current_creature().map(Creature::display_name) else {
            return false;
        };
        self.log_event(msg_ignored(&name));
        self.clear_encounter();
        true
    }

    /// Throw a ball at the current creature. No-op unless throwing is legal.
    pub fn throw_at(&mut self) -> ThrowOutcome {
        if !self.flags().can_throw {
            return ThrowOutcome::NotAllowed;
        }
        let Some(creature) = self.current_creature().cloned() else {
            return ThrowOutcome::NotAllowed;
        };
        let name = creature.display_name();
        let announce = msg_throw(&self.trainer.name, &name);
        self.log_event(announce);

        let roll = self.rolls.throw_roll();
        if roll > self.config.catch_threshold {
            log::debug!("caught {} with roll {roll:.3}", creature.name);
            self.captured.record(creature);
            self.log_event(msg_caught(&name));
            self.clear_encounter();
            self.persist_quietly();
            return ThrowOutcome::Caught;
        }

        let flee_after = self.config.flee_after_failures;
        let fled = match &mut self.encounter {
            EncounterState::Active {
                failure_count,
                fleeing,
                ..
            } => {
                *failure_count = failure_count.saturating_add(1);
                *fleeing = *failure_count >= flee_after;
                *fleeing
            }
            EncounterState::Idle => false,
        };
        self.touch();
        log::debug!("{} escaped roll {roll:.3}", creature.name);

        if fled {
            self.log_event(msg_ran_away(&name));
            let ticket = FleeTicket {
                generation: self.generation,
                delay: self.config.flee_delay(),
            };
            self.pending_flee = Some(ticket);
            ThrowOutcome::Fleeing(ticket)
        } else {
            self.log_event(msg_broke_free(&name));
            ThrowOutcome::BrokeFree
        }
    }

    /// Finish a flee once its delay has elapsed. Stale tickets (the
    /// encounter was already cleared or replaced) are ignored, so replaying
    /// a completion is harmless.
    pub fn complete_flee(&mut self, ticket: FleeTicket) -> bool {
        if self.pending_flee != Some(ticket)
            || ticket.generation != self.generation
            || !self.encounter.is_fleeing()
        {
            log::debug!("ignoring stale flee ticket {}", ticket.generation);
            return false;
        }
        self.clear_encounter();
        true
    }

    /// Return to idle, dropping any creature and any pending flee.
    pub fn clear_encounter(&mut self) {
        self.set_encounter(EncounterState::Idle);
    }

    /// Save and stay put.
    pub fn quit(&mut self) {
        self.persist_quietly();
    }

    fn set_encounter(&mut self, state: EncounterState) {
        self.encounter = state;
        self.generation += 1;
        self.pending_flee = None;
        self.touch();
    }

    const fn touch(&mut self) {
        self.revision += 1;
    }

    // Persistence -----------------------------------------------------------

    /// Write trainer, collection and log under the trainer's save key.
    ///
    /// # Errors
    ///
    /// Returns an error when no trainer is logged in, or when serialization
    /// or the store fails.
    pub fn persist(&self) -> Result<(), SaveError> {
        if self.trainer.name.is_empty() {
            return Err(SaveError::NoTrainer);
        }
        let record = SaveRecord {
            trainer: self.trainer.clone(),
            captured_pokemon: self.captured.clone(),
            event_log: self.event_log.clone(),
        };
        let json = record.to_json()?;
        self.store
            .set(&save_key(&self.trainer.name), &json)
            .map_err(|e| SaveError::Store(e.to_string()))
    }

    fn persist_quietly(&self) {
        if let Err(err) = self.persist() {
            log::error!("failed to save game for {:?}: {err}", self.trainer.name);
        }
    }

    /// Load the save stored for `name`. Returns `false`, leaving the session
    /// untouched, when there is no usable save.
    pub fn restore(&mut self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        let key = save_key(name);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(err) => {
                log::error!("failed to read save {key}: {err}");
                return false;
            }
        };
        let record = match SaveRecord::from_json(&raw) {
            Ok(record) => record,
            Err(err) => {
                log::error!("error loading save {key}: {err}");
                return false;
            }
        };
        if record.trainer.name.is_empty() {
            log::warn!("save {key} has no trainer name; ignoring it");
            return false;
        }

        self.trainer = Trainer::logged_in(record.trainer.name);
        self.captured = record.captured_pokemon;
        self.event_log = record.event_log;
        self.touch();
        let welcome = msg_welcome_back(&self.trainer.name);
        self.log_event(welcome);
        true
    }
}
