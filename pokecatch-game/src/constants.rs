//! Centralized tuning constants and player-facing message templates.
//!
//! The numbers here are the defaults behind [`crate::SessionConfig`]; the
//! message helpers are the only place event-log wording is spelled out.

// Encounter tuning ---------------------------------------------------------
pub const MIN_CREATURE_ID: u16 = 1;
pub const MAX_CREATURE_ID: u16 = 151;
/// A throw succeeds when the roll is strictly greater than this value.
pub const CATCH_THRESHOLD: f64 = 1.0 / 3.0;
pub const FLEE_AFTER_FAILURES: u8 = 2;
pub const FLEE_DELAY_MS: u64 = 1_000;

// Persistence --------------------------------------------------------------
pub const SAVE_KEY_PREFIX: &str = "save:";

// Event log messages -------------------------------------------------------
pub(crate) const MSG_FIND_FAILED: &str = "Failed to find a Pokemon. Try again!";

pub(crate) fn msg_welcome(trainer: &str) -> String {
    format!("Welcome, {trainer}! Get to catching!")
}

pub(crate) fn msg_welcome_back(trainer: &str) -> String {
    format!("Welcome back, {trainer}!")
}

pub(crate) fn msg_appeared(name: &str) -> String {
    format!("A {name} has appeared!")
}

pub(crate) fn msg_ignored(name: &str) -> String {
    format!("You ignored {name} :(")
}

pub(crate) fn msg_throw(trainer: &str, name: &str) -> String {
    format!("{trainer} throws a ball at {name}!")
}

pub(crate) fn msg_caught(name: &str) -> String {
    format!("{name} was caught!")
}

pub(crate) fn msg_ran_away(name: &str) -> String {
    format!("{name} ran away!")
}

pub(crate) fn msg_broke_free(name: &str) -> String {
    format!("{name} broke free!")
}
