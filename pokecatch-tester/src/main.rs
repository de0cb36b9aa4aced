mod autoplay;
mod driver;
mod file_store;
mod pokeapi;
mod provider;
mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use pokecatch_game::{GameSession, SeededRolls, SessionConfig, SystemClock};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use autoplay::{AutoplayPolicy, run_autoplay};
use file_store::JsonFileStore;
use pokeapi::DEFAULT_API_BASE;
use provider::{AnyProvider, ProviderKind};
use report::{
    ReportFormat, inspect_save, write_autoplay_console, write_inspect_console, write_json,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Log in, play a number of encounters, quit
    Autoplay,
    /// Print a stored save without touching it
    Inspect,
}

#[derive(Debug, Parser)]
#[command(name = "pokecatch-tester", version)]
#[command(about = "Headless driver for Pokecatch sessions")]
struct Args {
    /// What to do with the trainer's save
    #[arg(long, value_enum, default_value_t = RunMode::Autoplay)]
    mode: RunMode,

    /// Trainer to log in as
    #[arg(long, default_value = "Red")]
    trainer: String,

    /// Directory holding one JSON file per save key
    #[arg(long, default_value = "target/pokecatch-saves")]
    save_dir: PathBuf,

    /// Where creature data comes from
    #[arg(long, value_enum, default_value_t = ProviderKind::Pokeapi)]
    provider: ProviderKind,

    /// PokeAPI base URL (pokeapi provider only)
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Seed for encounter and throw rolls; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of searches to run in autoplay mode
    #[arg(long, default_value_t = 10)]
    encounters: usize,

    /// Ignore creatures the trainer already owns
    #[arg(long)]
    skip_duplicates: bool,

    /// Session config JSON; stock values fill anything omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the flee delay from the config
    #[arg(long)]
    flee_delay_ms: Option<u64>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Include the full event log in console reports
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let store = JsonFileStore::new(&args.save_dir);
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.mode {
        RunMode::Inspect => {
            let report = inspect_save(&store, &args.trainer)?;
            match args.report {
                ReportFormat::Console => write_inspect_console(output_target.writer(), &report)?,
                ReportFormat::Json => write_json(output_target.writer(), &report)?,
            }
        }
        RunMode::Autoplay => {
            let config = load_config(args.config.as_deref(), args.flee_delay_ms)?;
            let provider = AnyProvider::from_kind(args.provider, &args.api_base)?;
            let rolls = args.seed.map_or_else(SeededRolls::from_entropy, SeededRolls::new);
            log::info!(
                "autoplay: trainer={} provider={:?} seed={:?} saves={}",
                args.trainer,
                args.provider,
                args.seed,
                store.dir().display()
            );
            let session = GameSession::with_parts(provider, store, rolls, SystemClock, config);
            let policy = AutoplayPolicy {
                skip_duplicates: args.skip_duplicates,
            };
            let report = run_autoplay(session, &args.trainer, args.encounters, policy).await?;
            match args.report {
                ReportFormat::Console => {
                    write_autoplay_console(output_target.writer(), &report, args.verbose)?;
                }
                ReportFormat::Json => write_json(output_target.writer(), &report)?,
            }
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

fn announce_banner() {
    println!("{}", "🎮 Pokecatch Tester".bright_cyan().bold());
    println!("{}", "===================".cyan());
}

fn load_config(path: Option<&Path>, flee_delay_ms: Option<u64>) -> Result<SessionConfig> {
    let mut config = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            SessionConfig::from_json(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };
    if let Some(delay) = flee_delay_ms {
        config.flee_delay_ms = delay;
    }
    config.validate()?;
    Ok(config)
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
