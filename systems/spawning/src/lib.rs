#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scarecrow_core::{unit_from_heading, Command, EnemyKind, EnemySpawn, Event, PlayState};

const INITIAL_SPAWN_INTERVAL: f32 = 60.0;
const MIN_SPAWN_INTERVAL: f32 = 15.0;
const SPAWN_INTERVAL_DECAY: f32 = 0.2;
const BOSS_PHASE_SPAWN_INTERVAL: f32 = 90.0;
const ELITE_SECONDS: [u32; 2] = [60, 120];
const BOSS_SECOND: u32 = 180;
const SPAWN_MARGIN: f32 = 100.0;
const CROW_BASE_THRESHOLD: f32 = 0.8;
const CROW_THRESHOLD_DRIFT: f32 = 0.002;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    viewport: Vec2,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided viewport size and seed.
    #[must_use]
    pub const fn new(viewport: Vec2, rng_seed: u64) -> Self {
        Self {
            viewport,
            rng_seed,
        }
    }
}

/// Pure system that deterministically emits spawn commands while the game runs.
#[derive(Debug)]
pub struct Spawning {
    viewport: Vec2,
    spawn_interval: f32,
    frames_since_spawn: u32,
    elapsed_seconds: u32,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            viewport: config.viewport,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            frames_since_spawn: 0,
            elapsed_seconds: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Updates the viewport used to place spawns just outside the screen.
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Current interval between ordinary spawns, in frames.
    #[must_use]
    pub fn spawn_interval(&self) -> f32 {
        if self.elapsed_seconds >= BOSS_SECOND {
            BOSS_PHASE_SPAWN_INTERVAL
        } else {
            self.spawn_interval
        }
    }

    /// Consumes events and immutable views to emit spawn commands.
    ///
    /// Time only advances through events, so a paused world produces nothing
    /// to react to. Terminal states silence the system entirely.
    pub fn handle(
        &mut self,
        events: &[Event],
        play_state: PlayState,
        player_position: Vec2,
        out: &mut Vec<Command>,
    ) {
        if play_state.is_terminal() {
            return;
        }

        for event in events {
            match event {
                Event::SecondElapsed { seconds } => {
                    self.elapsed_seconds = *seconds;
                    self.on_second(player_position, out);
                }
                Event::TimeAdvanced { .. } => {
                    self.frames_since_spawn = self.frames_since_spawn.saturating_add(1);
                    if self.frames_since_spawn as f32 >= self.spawn_interval() {
                        self.frames_since_spawn = 0;
                        let kind = self.roll_ordinary_kind();
                        out.push(Command::SpawnEnemy {
                            spawn: self.spawn_near(kind, player_position),
                        });
                        if self.spawn_interval > MIN_SPAWN_INTERVAL {
                            self.spawn_interval -= SPAWN_INTERVAL_DECAY;
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn on_second(&mut self, player_position: Vec2, out: &mut Vec<Command>) {
        if ELITE_SECONDS.contains(&self.elapsed_seconds) {
            log::debug!("elite spawns at {}s", self.elapsed_seconds);
            out.push(Command::SpawnEnemy {
                spawn: self.spawn_near(EnemyKind::Elite, player_position),
            });
        }
        if self.elapsed_seconds == BOSS_SECOND {
            log::info!("boss spawns at {}s", self.elapsed_seconds);
            out.push(Command::BeginBossEncounter {
                spawn: self.spawn_near(EnemyKind::Boss, player_position),
            });
        }
    }

    fn roll_ordinary_kind(&mut self) -> EnemyKind {
        let threshold = CROW_BASE_THRESHOLD - self.elapsed_seconds as f32 * CROW_THRESHOLD_DRIFT;
        if self.rng.gen::<f32>() > threshold {
            EnemyKind::Crow
        } else {
            EnemyKind::Worm
        }
    }

    fn spawn_near(&mut self, kind: EnemyKind, player_position: Vec2) -> EnemySpawn {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let reach = self.viewport.max_element() / 2.0 + SPAWN_MARGIN;
        let speed = kind.profile().speed_for(self.rng.gen::<f32>());
        EnemySpawn {
            kind,
            position: player_position + unit_from_heading(angle) * reach,
            speed,
        }
    }
}
