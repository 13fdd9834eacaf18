//! Headless host entry point.
//!
//! Loads every module under the mods directory, restores the previous session,
//! drives a fixed number of ticks while a simulated network adds and removes
//! actors, then saves the session.
mod sim;

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use game_content::{ContentModule, DirectoryModule};
use game_core::{Aabb, Vec3};
use runtime::{Event, Runtime, RuntimeConfig, Topic};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_TICKS: u64 = 200;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = RuntimeConfig::from_env();
    let ticks = read_env::<u64>("HOST_TICKS").unwrap_or(DEFAULT_TICKS);

    setup_logging()?;

    let modules = DirectoryModule::discover(&config.mods_dir)
        .with_context(|| format!("failed to discover mods in {}", config.mods_dir.display()))?
        .into_iter()
        .map(|module| Box::new(module) as Box<dyn ContentModule>);

    let mut runtime = Runtime::builder()
        .config(config)
        .modules(modules)
        .build()
        .context("failed to build runtime")?;

    match runtime.load() {
        Ok(Some(summary)) => info!(
            game_version = %summary.version.game_version,
            worlds = summary.worlds.loaded,
            "restored previous session"
        ),
        Ok(None) => info!("starting a new session"),
        Err(error) => warn!(%error, "previous session could not be restored, starting fresh"),
    }
    runtime.session_mut().create_world("overworld");

    let mut actor_events = runtime.events().subscribe(Topic::Actors);
    tokio::spawn(async move {
        while let Ok(event) = actor_events.recv().await {
            if let Event::Actor(event) = event {
                info!(target: "actors", ?event, "actor event");
            }
        }
    });

    let actor_types = runtime
        .context()
        .catalog()
        .actor_types
        .iter()
        .map(|definition| definition.definition.id.clone())
        .collect();
    let interval = runtime.config().tick_interval;
    let network = tokio::spawn(sim::run(
        runtime.queue(),
        actor_types,
        ticks / 2,
        12,
        interval * 2,
    ));

    let spawn_area = Aabb::new(Vec3::splat(-1.0), Vec3::new(8.0, 1.0, 8.0));
    let mut ticker = tokio::time::interval(interval);
    for _ in 0..ticks {
        ticker.tick().await;
        runtime.tick();

        if runtime.ticks() % 50 == 0 {
            let mut nearby = Vec::new();
            runtime.actors().actors_in_box(spawn_area, &mut nearby);
            info!(
                tick = runtime.ticks(),
                live = runtime.actors().len(),
                players = runtime.actors().players().count(),
                near_spawn = nearby.len(),
                "status"
            );
        }
    }

    network.await.context("simulated network task failed")?;
    let bytes = runtime.save().context("failed to save session")?;
    info!(bytes, path = %runtime.config().session_path().display(), "session saved");

    Ok(())
}

/// Setup logging to both stderr and file
fn setup_logging() -> Result<()> {
    let log_dir = log_directory();
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, "mod-host.log");
    let (non_blocking_file, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    // Leak the guard to keep file writer alive
    std::mem::forget(_guard);

    info!("Log file: {}/mod-host.log", log_dir.display());
    Ok(())
}

/// Platform cache directory for logs, falling back to `/tmp/modhost/logs`.
fn log_directory() -> PathBuf {
    directories::ProjectDirs::from("", "", "modhost")
        .map(|dirs| dirs.cache_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from("/tmp/modhost/logs"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
