#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame-driven engine that owns the Scarecrow Survivors world and systems.
//!
//! A presentation layer drives the engine by calling [`Engine::step`] once per
//! display frame and forwarding player intent through the control calls. The
//! engine ticks the world, lets every system react to the resulting events,
//! applies their commands until nothing new is requested, and translates the
//! outcome into [`Notification`] values for the HUD and dialogs. Scene state
//! for drawing is read through [`scarecrow_world::query`] via [`Engine::world`].

mod config;
mod input;

use glam::Vec2;
use scarecrow_core::{
    Command, Event, PlayState, ProgressionMode, TreasureOutcome, TreasureReport, TreasureTier,
    UpgradeChoice, UpgradeOption,
};
use scarecrow_system_progression::{self as progression, Progression, ProgressionViews};
use scarecrow_system_spawning::{self as spawning, Spawning};
use scarecrow_system_weapons::{self as weapons, Armory};
use scarecrow_world::{self as world, query, World};
use serde::Serialize;

pub use config::{ConfigError, EngineConfig, Viewport, DEFAULT_HUD_INTERVAL_FRAMES};

use input::KeyState;

const MAX_SETTLE_ROUNDS: usize = 32;

const SPAWNING_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
const WEAPONS_STREAM: u64 = 0xbf58_476d_1ce4_e5b9;
const PROGRESSION_STREAM: u64 = 0x94d0_49bb_1331_11eb;

/// Values shown on the heads-up display.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HudSnapshot {
    /// Current hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Experience towards the next level.
    pub exp: u32,
    /// Experience required for the next level.
    pub max_exp: u32,
    /// Current level.
    pub level: u32,
    /// Current score.
    pub score: u64,
    /// Elapsed play time formatted as `mm:ss`.
    pub time: String,
    /// Mature wheat waiting to be harvested; only reported in harvest mode.
    pub harvestable_wheat: Option<u32>,
}

/// Treasure box contents laid out for the reveal dialog.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreasureReveal {
    /// Heading for the dialog.
    pub title: &'static str,
    /// Tier rolled for the box.
    pub tier: TreasureTier,
    /// One line per slot, in the order they were applied.
    pub lines: Vec<TreasureLine>,
}

/// One revealed slot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TreasureLine {
    /// What the slot granted.
    pub outcome: TreasureOutcome,
    /// Display text, e.g. `Veggie Toss reached Lv3 (Epic)`.
    pub text: String,
    /// Display colour as a CSS hex string.
    pub color: &'static str,
}

impl From<&TreasureReport> for TreasureReveal {
    fn from(report: &TreasureReport) -> Self {
        Self {
            title: report.title(),
            tier: report.tier,
            lines: report
                .outcomes
                .iter()
                .map(|outcome| TreasureLine {
                    outcome: *outcome,
                    text: outcome.text(),
                    color: outcome.color(),
                })
                .collect(),
        }
    }
}

/// Outward messages produced for the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Notification {
    /// Periodic HUD refresh.
    Hud(HudSnapshot),
    /// Upgrade options to present; answer with [`Engine::apply_upgrade`].
    LevelUp(Vec<UpgradeOption>),
    /// Contents of an opened treasure box; dismiss with [`Engine::resume`].
    Treasure(TreasureReveal),
    /// The player was defeated.
    GameOver,
    /// The boss fell and the stage is over.
    StageClear {
        /// Final score.
        score: u64,
    },
}

/// Formats elapsed seconds as `mm:ss`.
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Owns one game session: the world, every system and the held input.
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    world: World,
    spawning: Spawning,
    armory: Armory,
    progression: Progression,
    keys: KeyState,
}

impl Engine {
    /// Starts a session from a validated configuration.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let seed = config.seed;
        log::debug!("starting {:?} session with seed {seed}", config.mode);
        Ok(Self {
            world: World::with_config(config.world_config()),
            spawning: Spawning::new(spawning::Config::new(
                config.viewport.size(),
                seed ^ SPAWNING_STREAM,
            )),
            armory: Armory::new(weapons::Config::new(seed ^ WEAPONS_STREAM)),
            progression: Progression::new(progression::Config::new(seed ^ PROGRESSION_STREAM)),
            keys: KeyState::default(),
            config,
        })
    }

    /// Configuration the session was started with, including any resize.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only access to the world for rendering through [`query`].
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current play state.
    #[must_use]
    pub fn play_state(&self) -> PlayState {
        query::play_state(&self.world)
    }

    /// Advances one frame and pushes any resulting notifications.
    ///
    /// Does nothing unless the session is playing.
    pub fn step(&mut self, out: &mut Vec<Notification>) {
        if !self.play_state().is_playing() {
            return;
        }
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::Tick {
                keys: self.keys.keys(),
            },
            &mut events,
        );
        self.settle(events, out);

        if query::frame(&self.world) % self.config.hud_interval_frames == 0 {
            out.push(Notification::Hud(self.hud()));
        }
    }

    /// Builds the HUD values for the current frame.
    #[must_use]
    pub fn hud(&self) -> HudSnapshot {
        let player = query::player(&self.world);
        let harvestable_wheat = match query::mode(&self.world) {
            ProgressionMode::Classic => None,
            ProgressionMode::Harvest => {
                Some(u32::try_from(query::harvestable_wheat(&self.world)).unwrap_or(u32::MAX))
            }
        };
        HudSnapshot {
            hp: player.hp,
            max_hp: player.max_hp,
            exp: player.exp,
            max_exp: player.max_exp,
            level: player.level,
            score: player.score,
            time: format_clock(query::elapsed_seconds(&self.world)),
            harvestable_wheat,
        }
    }

    /// Leaves an upgrade, treasure or external pause.
    pub fn resume(&mut self, out: &mut Vec<Notification>) {
        self.submit(Command::Resume, out);
    }

    /// Suspends a playing session until [`Engine::resume`].
    pub fn pause(&mut self, out: &mut Vec<Notification>) {
        self.submit(Command::Pause, out);
    }

    /// Ends the session; every later call is ignored.
    pub fn teardown(&mut self, out: &mut Vec<Notification>) {
        self.keys.clear();
        self.submit(Command::Teardown, out);
    }

    /// Applies the upgrade picked from a level-up prompt and resumes play.
    ///
    /// Keys that match neither a weapon nor the `"max"` sentinel are ignored.
    pub fn apply_upgrade(&mut self, key: &str, out: &mut Vec<Notification>) {
        let choice = match UpgradeChoice::parse(key) {
            Ok(choice) => choice,
            Err(error) => {
                log::debug!("ignoring upgrade request: {error}");
                return;
            }
        };
        self.submit(Command::ApplyUpgrade { choice }, out);
        self.submit(Command::Resume, out);
    }

    /// Records a movement key press. Keys that do not move are ignored.
    pub fn key_down(&mut self, name: &str) {
        if !self.keys.press(name) {
            log::trace!("key {name} does not move the player");
        }
    }

    /// Records a movement key release.
    pub fn key_up(&mut self, name: &str) {
        let _ = self.keys.release(name);
    }

    /// Steers the player towards a world position while playing.
    pub fn press_pointer(&mut self, target: Vec2) {
        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::SetPointerTarget { target },
            &mut events,
        );
    }

    /// Stops pointer steering.
    pub fn release_pointer(&mut self) {
        let mut events = Vec::new();
        world::apply(&mut self.world, Command::ReleasePointer, &mut events);
    }

    /// Converts a point on screen into world coordinates.
    ///
    /// The camera keeps the player at the centre of the viewport.
    #[must_use]
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        query::player(&self.world).position - self.config.viewport.size() * 0.5 + screen
    }

    /// Adopts a new viewport size so spawns stay just offscreen.
    pub fn resize(&mut self, width: f32, height: f32) {
        let viewport = Viewport { width, height };
        if !viewport.is_valid() {
            log::debug!("ignoring resize to {width}x{height}");
            return;
        }
        self.config.viewport = viewport;
        self.spawning.resize(viewport.size());
    }

    /// Elapsed simulation time in frames.
    #[must_use]
    pub fn frame(&self) -> u64 {
        query::frame(&self.world)
    }

    fn submit(&mut self, command: Command, out: &mut Vec<Notification>) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.settle(events, out);
    }

    fn settle(&mut self, mut events: Vec<Event>, out: &mut Vec<Notification>) {
        for _ in 0..MAX_SETTLE_ROUNDS {
            if events.is_empty() {
                return;
            }
            notify(&events, out);

            let commands = self.react(&events);
            if commands.is_empty() {
                return;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
        if !events.is_empty() {
            log::warn!(
                "systems kept issuing commands after {MAX_SETTLE_ROUNDS} rounds; deferring {} events",
                events.len()
            );
            notify(&events, out);
        }
    }

    fn react(&mut self, events: &[Event]) -> Vec<Command> {
        let mut commands = Vec::new();
        let player = query::player(&self.world);

        self.spawning.handle(
            events,
            query::play_state(&self.world),
            player.position,
            &mut commands,
        );
        self.armory.handle(
            events,
            player.position,
            &query::enemy_view(&self.world),
            &mut commands,
        );
        let wheat = query::wheat(&self.world);
        self.progression.handle(
            events,
            ProgressionViews {
                loadout: player.loadout,
                cultivation: query::cultivation(&self.world),
                wheat: &wheat,
            },
            &mut commands,
        );
        commands
    }
}

fn notify(events: &[Event], out: &mut Vec<Notification>) {
    for event in events {
        match event {
            Event::UpgradesOffered { options, .. } => {
                out.push(Notification::LevelUp(options.clone()));
            }
            Event::TreasureOpened { report } => out.push(Notification::Treasure(report.into())),
            Event::GameOver => out.push(Notification::GameOver),
            Event::StageCleared { score } => {
                out.push(Notification::StageClear { score: *score });
            }
            _ => {}
        }
    }
}
