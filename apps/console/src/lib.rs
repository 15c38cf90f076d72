//! Console host for the matching game: SQLite progress, JSON commands on
//! stdin/stdout, logs on stderr.

pub mod commands;
pub mod db;
pub mod driver;
pub mod state;

use anyhow::Context;
use db::SqliteStore;
use matchroom_core::GameConfig;
use state::AppState;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Path of the progress database. `MATCHROOM_DB` overrides the default.
pub fn get_db_path() -> PathBuf {
    if let Ok(path) = std::env::var("MATCHROOM_DB") {
        return PathBuf::from(path);
    }
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("matchroom")
        .join("progress.db")
}

/// Engine config from the JSON file named by `MATCHROOM_CONFIG`, or defaults.
pub fn load_config() -> anyhow::Result<GameConfig> {
    let Ok(path) = std::env::var("MATCHROOM_CONFIG") else {
        return Ok(GameConfig::default());
    };
    let raw = std::fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
    parse_config(&raw).with_context(|| format!("loading config {path}"))
}

/// Parse and validate a JSON config. Missing fields keep their default values.
pub fn parse_config(raw: &str) -> anyhow::Result<GameConfig> {
    let config: GameConfig = serde_json::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

pub fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = load_config()?;
    let db_path = get_db_path();
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("opening database {}", db_path.display()))?;

    let mut state = AppState::new(store, config);
    if let Ok(seed) = std::env::var("MATCHROOM_SEED") {
        state = state.with_rng_seed(seed.parse().context("MATCHROOM_SEED must be a number")?);
    }
    tracing::info!(db = %db_path.display(), "matchroom ready");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if matches!(driver::parse_command(&line), Ok(Some(driver::Command::Quit))) {
            break;
        }
        if let Some(reply) = driver::handle_line(&state, &line) {
            writeln!(stdout, "{reply}")?;
            stdout.flush()?;
        }
    }
    Ok(())
}
