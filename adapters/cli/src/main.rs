#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Scarecrow Survivors session headlessly.
//!
//! An autopilot stands in for the player: it steers with the pointer, takes the
//! first upgrade it is offered and dismisses every treasure reveal. Every
//! notification is printed as one JSON line, followed by a summary line.

use std::{
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use scarecrow_core::{Loadout, PlayState, ProgressionMode, FRAMES_PER_SECOND};
use scarecrow_engine::{format_clock, Engine, EngineConfig, Notification};
use scarecrow_system_weapons::nearest_enemy;
use scarecrow_world::query;
use serde::Serialize;

const KITE_TRIGGER_RANGE: f32 = 160.0;
const KITE_STRIDE: f32 = 80.0;

/// Runs a headless Scarecrow Survivors session and prints what happened.
#[derive(Debug, Parser)]
#[command(name = "scarecrow-survivors", version, about)]
struct Cli {
    /// TOML file with engine settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the seed from the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Overrides the progression mode from the config file.
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    /// Upper bound on simulated frames.
    #[arg(long, default_value_t = 4 * 60 * FRAMES_PER_SECOND)]
    frames: u64,
    /// How the autopilot moves the scarecrow.
    #[arg(long, value_enum, default_value_t = Pilot::Kite)]
    pilot: Pilot,
    /// Print HUD refreshes as well.
    #[arg(long)]
    hud: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Classic,
    Harvest,
}

impl From<ModeArg> for ProgressionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Classic => Self::Classic,
            ModeArg::Harvest => Self::Harvest,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Pilot {
    /// Stand still at the spawn point.
    Idle,
    /// Step away from the closest enemy once it gets near.
    Kite,
}

#[derive(Debug, Serialize)]
struct Summary {
    outcome: PlayState,
    frames: u64,
    time: String,
    level: u32,
    score: u64,
    hp: f32,
    loadout: Loadout,
}

impl Cli {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => EngineConfig::load(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => EngineConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        config.validate().context("invalid engine config")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.engine_config()?;
    log::info!(
        "running {:?} session with seed {} for up to {} frames",
        config.mode,
        config.seed,
        cli.frames
    );
    let mut engine = Engine::new(config).context("failed to start engine")?;

    let stdout = io::stdout();
    let mut output = BufWriter::new(stdout.lock());
    run(&mut engine, &cli, &mut output)?;
    output.flush().context("failed to flush output")?;
    Ok(())
}

fn run(engine: &mut Engine, cli: &Cli, output: &mut impl Write) -> Result<()> {
    let mut notifications = Vec::new();
    for _ in 0..cli.frames {
        if cli.pilot == Pilot::Kite {
            kite(engine);
        }
        engine.step(&mut notifications);

        let mut follow_up = Vec::new();
        for notification in &notifications {
            match notification {
                Notification::LevelUp(options) => {
                    let key = options.first().map_or("max", |option| option.choice.key());
                    engine.apply_upgrade(key, &mut follow_up);
                }
                Notification::Treasure(_) => engine.resume(&mut follow_up),
                _ => {}
            }
        }
        notifications.append(&mut follow_up);

        for notification in notifications.drain(..) {
            if matches!(notification, Notification::Hud(_)) && !cli.hud {
                continue;
            }
            emit(output, &notification)?;
        }

        if engine.play_state().is_terminal() {
            break;
        }
    }

    let player = query::player(engine.world());
    let summary = Summary {
        outcome: engine.play_state(),
        frames: engine.frame(),
        time: format_clock(query::elapsed_seconds(engine.world())),
        level: player.level,
        score: player.score,
        hp: player.hp,
        loadout: player.loadout,
    };
    emit(output, &summary)?;

    engine.teardown(&mut notifications);
    Ok(())
}

fn kite(engine: &mut Engine) {
    let player = query::player(engine.world());
    let threat = nearest_enemy(player.position, &query::enemy_view(engine.world()))
        .filter(|enemy| enemy.distance(player.position) < KITE_TRIGGER_RANGE);
    match threat {
        Some(enemy) => {
            let away = (player.position - enemy).normalize_or_zero();
            let away = if away == Vec2::ZERO { Vec2::X } else { away };
            engine.press_pointer(player.position + away * KITE_STRIDE);
        }
        None => engine.release_pointer(),
    }
}

fn emit(output: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer(&mut *output, value).context("failed to encode output line")?;
    writeln!(output).context("failed to write output line")?;
    Ok(())
}
