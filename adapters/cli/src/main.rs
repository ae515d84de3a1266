#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Swarm Survival session.

mod camera;
mod input;
mod session;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use swarm_survival_persistence::{GameDao, JsonFileDao, SaveDocument};

use crate::input::ScriptedInput;
use crate::session::{Session, SessionState};

/// Headless runner for the Swarm Survival simulation.
#[derive(Debug, Parser)]
#[command(name = "swarm-survival")]
struct Args {
    /// Path of the save file to load from and persist to.
    #[arg(long, default_value = "swarm-save.json")]
    save: PathBuf,

    /// Seed for the spawn and upgrade sampling RNG.
    #[arg(long, default_value_t = 0x4d59_5df4_d0f3_3173)]
    seed: u64,

    /// Number of ticks to simulate before stopping.
    #[arg(long, default_value_t = 3600)]
    ticks: u32,

    /// Discard the persisted save and start over.
    #[arg(long)]
    reset: bool,

    /// Ignore any persisted save without deleting it.
    #[arg(long)]
    fresh: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let dao = JsonFileDao::new(&args.save);

    let document = if args.fresh {
        SaveDocument::default()
    } else {
        dao.load_game()
    };
    let mut session = Session::from_document(&document, args.seed);
    if args.reset {
        session.reset(&dao)?;
        tracing::info!("persisted save cleared");
    }
    let mut input = ScriptedInput::new();

    for _ in 0..args.ticks {
        match session.state() {
            SessionState::Running | SessionState::Paused => session.tick(&mut input),
            SessionState::UpgradeSelection => {
                let choices = session.upgrade_choices();
                session.apply_upgrade(choices.first().copied());
            }
            SessionState::Dead | SessionState::Won => break,
        }
    }

    report(&session);

    if session.save(&dao)? {
        tracing::info!(path = %args.save.display(), "session saved");
    } else {
        tracing::info!("dead session; save suppressed");
    }
    Ok(())
}

fn report(session: &Session) {
    let world = session.world();
    let player = world.player();
    println!(
        "state={:?} clock={:.0}ms level={} xp={} hp={:.0}/{:.0} monsters={} bullets={} items={}",
        session.state(),
        world.clock().now(),
        player.level(),
        player.experience(),
        player.health().current(),
        player.health().maximum(),
        world.monster_count(),
        world.bullet_count(),
        world.item_count(),
    );
}
