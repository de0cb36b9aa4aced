//! Player-facing chronological event log.
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogEntry {
    /// Millisecond timestamp, strictly increasing within a log.
    pub id: i64,
    pub message: String,
    /// Local wall-clock time, e.g. `3:04:05 PM`.
    #[serde(rename = "timestamp")]
    pub display_time: String,
    /// RFC 3339 UTC instant with millisecond precision.
    #[serde(rename = "dateTime")]
    pub iso_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog(Vec<EventLogEntry>);

impl EventLog {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Append `message` stamped at `now`. Entries logged within the same
    /// millisecond get consecutive ids.
    pub fn push(&mut self, message: impl Into<String>, now: DateTime<Utc>) -> &EventLogEntry {
        let millis = now.timestamp_millis();
        let id = self
            .0
            .last()
            .map_or(millis, |last| millis.max(last.id.saturating_add(1)));
        self.0.push(EventLogEntry {
            id,
            message: message.into(),
            display_time: now.with_timezone(&Local).format("%-I:%M:%S %p").to_string(),
            iso_time: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        });
        &self.0[self.0.len() - 1]
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&EventLogEntry> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EventLogEntry> {
        self.0.iter()
    }

    /// Messages only, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|entry| entry.message.as_str())
    }

    #[must_use]
    pub fn as_slice(&self) -> &[EventLogEntry] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a EventLogEntry;
    type IntoIter = std::slice::Iter<'a, EventLogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    #[test]
    fn entries_carry_both_time_formats() {
        let mut log = EventLog::new();
        let entry = log.push("hello", at(1_700_000_000_123));
        assert_eq!(entry.id, 1_700_000_000_123);
        assert_eq!(entry.iso_time, "2023-11-14T22:13:20.123Z");
        assert!(entry.display_time.ends_with("AM") || entry.display_time.ends_with("PM"));
    }

    #[test]
    fn ids_stay_monotonic_when_clock_stalls() {
        let mut log = EventLog::new();
        log.push("one", at(5_000));
        log.push("two", at(5_000));
        log.push("three", at(4_000));
        let ids: Vec<i64> = log.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5_000, 5_001, 5_002]);
    }

    #[test]
    fn clear_empties_log() {
        let mut log = EventLog::new();
        log.push("one", at(1));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.messages().count(), 0);
    }

    #[test]
    fn entry_uses_save_field_names() {
        let mut log = EventLog::new();
        log.push("hi", at(0));
        let value = serde_json::to_value(&log).unwrap();
        assert_eq!(value[0]["message"], "hi");
        assert_eq!(value[0]["dateTime"], "1970-01-01T00:00:00.000Z");
        assert!(value[0]["timestamp"].is_string());
    }
}
