use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use colored::Colorize;
use pokecatch_game::{KeyValueStore, SaveRecord, save_key};
use serde::Serialize;
use std::io::Write;

use crate::autoplay::{AutoplayReport, DexLine, dex_lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
}

/// Read-only summary of a stored save.
#[derive(Debug, Clone, Serialize)]
pub struct InspectReport {
    pub trainer: String,
    pub save_key: String,
    pub unique_pokemon: usize,
    pub total_captured: usize,
    pub dex: Vec<DexLine>,
    pub log_entries: usize,
    pub recent_log: Vec<String>,
}

const RECENT_LOG_LINES: usize = 10;

pub fn inspect_save<S: KeyValueStore>(store: &S, trainer: &str) -> Result<InspectReport> {
    let key = save_key(trainer);
    let Some(raw) = store
        .get(&key)
        .with_context(|| format!("reading {key}"))?
    else {
        bail!("no save found for {trainer:?}");
    };
    let record = SaveRecord::from_json(&raw).with_context(|| format!("parsing {key}"))?;
    let skip = record.event_log.len().saturating_sub(RECENT_LOG_LINES);
    Ok(InspectReport {
        trainer: record.trainer.name.clone(),
        save_key: key,
        unique_pokemon: record.captured_pokemon.unique_count(),
        total_captured: record.captured_pokemon.total_count(),
        dex: dex_lines(&record.captured_pokemon),
        log_entries: record.event_log.len(),
        recent_log: record
            .event_log
            .messages()
            .skip(skip)
            .map(str::to_string)
            .collect(),
    })
}

pub fn write_json<T: Serialize>(out: &mut dyn Write, report: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn write_dex(out: &mut dyn Write, dex: &[DexLine]) -> Result<()> {
    if dex.is_empty() {
        writeln!(out, "   (no captures yet)")?;
        return Ok(());
    }
    for line in dex {
        writeln!(out, "   #{:03} {:<14} x{}", line.id, line.name, line.count)?;
    }
    Ok(())
}

pub fn write_autoplay_console(
    out: &mut dyn Write,
    report: &AutoplayReport,
    verbose: bool,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Autoplay Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "===================".cyan())?;
    let status = if report.restored {
        "returning".green()
    } else {
        "new".yellow()
    };
    writeln!(out, "Trainer: {} ({status})", report.trainer.bold())?;

    let stats = &report.stats;
    writeln!(
        out,
        "Searches: {} ({} failed)",
        stats.searches,
        stats.failed_searches.to_string().red()
    )?;
    writeln!(out, "Throws: {}", stats.throws)?;
    writeln!(out, "Caught: {}", stats.caught.to_string().green())?;
    writeln!(out, "Fled: {}", stats.fled.to_string().red())?;
    writeln!(out, "Ignored: {}", stats.ignored)?;
    if stats.throws > 0 {
        #[allow(clippy::cast_precision_loss)]
        let rate = stats.caught as f64 / stats.throws as f64 * 100.0;
        writeln!(out, "Catch rate per throw: {rate:.1}%")?;
    }
    writeln!(
        out,
        "Collection: {} unique / {} total",
        report.unique_pokemon, report.total_captured
    )?;
    write_dex(out, &report.dex)?;

    if verbose {
        writeln!(out)?;
        writeln!(out, "{}", "📜 Event Log".bright_yellow().bold())?;
        for message in &report.log {
            writeln!(out, "   • {message}")?;
        }
    }
    writeln!(out, "Elapsed: {} ms", report.elapsed_ms)?;
    Ok(())
}

pub fn write_inspect_console(out: &mut dyn Write, report: &InspectReport) -> Result<()> {
    writeln!(out, "{}", "🎒 Saved Trainer".bright_cyan().bold())?;
    writeln!(out, "{}", "================".cyan())?;
    writeln!(out, "Trainer: {}", report.trainer.bold())?;
    writeln!(out, "Key: {}", report.save_key)?;
    writeln!(
        out,
        "Collection: {} unique / {} total",
        report.unique_pokemon, report.total_captured
    )?;
    write_dex(out, &report.dex)?;
    writeln!(out, "Log entries: {}", report.log_entries)?;
    for message in &report.recent_log {
        writeln!(out, "   • {message}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoplay::AutoplayStats;
    use pokecatch_game::MemoryStore;

    fn sample_report() -> AutoplayReport {
        AutoplayReport {
            trainer: "Ash".to_string(),
            restored: false,
            stats: AutoplayStats {
                searches: 3,
                failed_searches: 0,
                throws: 4,
                caught: 2,
                fled: 1,
                ignored: 0,
            },
            unique_pokemon: 2,
            total_captured: 2,
            dex: vec![DexLine {
                id: 25,
                name: "Pikachu".to_string(),
                count: 1,
            }],
            log: vec!["Welcome, Ash! Get to catching!".to_string()],
            elapsed_ms: 12,
        }
    }

    #[test]
    fn console_report_lists_dex_and_log() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_autoplay_console(&mut out, &sample_report(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Trainer: Ash (new)"));
        assert!(text.contains("#025 Pikachu"));
        assert!(text.contains("Catch rate per throw: 50.0%"));
        assert!(text.contains("Welcome, Ash! Get to catching!"));
    }

    #[test]
    fn json_report_is_parseable() {
        let mut out = Vec::new();
        write_json(&mut out, &sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["stats"]["caught"], 2);
        assert_eq!(value["dex"][0]["name"], "Pikachu");
    }

    #[test]
    fn inspect_reads_stored_save() {
        let store = MemoryStore::new();
        store
            .set(
                "save:Ash",
                r#"{"trainer":{"name":"Ash","isLoggedIn":true},
                    "capturedPokemon":[{"id":4,"name":"charmander","sprite":null,"types":["fire"],"height":6,"weight":85,"stats":{}}],
                    "eventLog":[]}"#,
            )
            .unwrap();
        let report = inspect_save(&store, "Ash").unwrap();
        assert_eq!(report.total_captured, 1);
        assert_eq!(report.dex[0].name, "Charmander");
        assert_eq!(report.save_key, "save:Ash");
    }

    #[test]
    fn inspect_without_save_fails() {
        let store = MemoryStore::new();
        let err = inspect_save(&store, "Nobody").unwrap_err();
        assert!(err.to_string().contains("no save found"));
    }
}
