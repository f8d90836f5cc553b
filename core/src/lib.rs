#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Scarecrow Survivors engine.
//!
//! This crate defines the message surface that connects the engine, the
//! authoritative world, and pure systems. The engine submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

mod catalogue;
mod geometry;

use std::collections::BTreeSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub use catalogue::{
    Appearance, BodyShape, EnemyKind, EnemyProfile, Rarity, TreasureTier, UnknownUpgradeKey,
    UpgradeChoice, VeggieSkin, WeaponKind, WeaponProfile, MAX_SENTINEL_KEY, MAX_WEAPON_LEVEL,
    TREASURE_BONUS_COLOR, TREASURE_BONUS_SCORE,
};
pub use geometry::{direction_between, distance, heading, unit_from_heading, FieldTile, TILE_SIZE};

/// Number of simulation frames that make up one in-game second.
pub const FRAMES_PER_SECOND: u64 = 60;

/// Selects how crossing the experience threshold rewards the player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressionMode {
    /// Every level-up pauses immediately and offers weapon upgrades.
    #[default]
    Classic,
    /// Level-ups plant wheat; harvesting mature wheat offers upgrades and
    /// movement is restricted to cultivated ground.
    Harvest,
}

/// Why the simulation is currently suspended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PauseReason {
    /// Waiting for the player to pick an upgrade.
    UpgradeChoice,
    /// Waiting for the player to dismiss a treasure reveal.
    Treasure,
    /// Paused on request of the presentation layer.
    External,
    /// The boss fell and the stage is over; terminal.
    StageClear {
        /// Score at the moment the stage cleared.
        score: u64,
    },
}

/// Top-level state of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// The simulation advances every frame.
    Playing,
    /// The simulation is suspended for the provided reason.
    Paused(PauseReason),
    /// The player ran out of hit points; terminal.
    GameOver,
    /// The session was torn down; terminal.
    TornDown,
}

impl PlayState {
    /// Whether frames currently advance the simulation.
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Whether the session can never return to [`PlayState::Playing`].
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::GameOver | Self::TornDown | Self::Paused(PauseReason::StageClear { .. })
        )
    }

    /// Whether an explicit resume may return the session to play.
    #[must_use]
    pub const fn is_resumable(&self) -> bool {
        matches!(
            self,
            Self::Paused(PauseReason::UpgradeChoice | PauseReason::Treasure | PauseReason::External)
        )
    }
}

/// Directional movement keys held during a frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct MoveKeys {
    /// Move towards negative y.
    pub up: bool,
    /// Move towards positive y.
    pub down: bool,
    /// Move towards negative x.
    pub left: bool,
    /// Move towards positive x.
    pub right: bool,
}

impl MoveKeys {
    /// Raw, unnormalised movement axis produced by the held keys.
    #[must_use]
    pub fn axis(&self) -> Vec2 {
        let mut axis = Vec2::ZERO;
        if self.up {
            axis.y -= 1.0;
        }
        if self.down {
            axis.y += 1.0;
        }
        if self.left {
            axis.x -= 1.0;
        }
        if self.right {
            axis.x += 1.0;
        }
        axis
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Levels of every weapon carried by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Loadout {
    levels: [u8; 4],
}

impl Loadout {
    /// Creates a loadout from explicit levels ordered as [`WeaponKind::ALL`].
    ///
    /// Levels above [`MAX_WEAPON_LEVEL`] are clamped.
    #[must_use]
    pub fn from_levels(levels: [u8; 4]) -> Self {
        Self {
            levels: levels.map(|level| level.min(MAX_WEAPON_LEVEL)),
        }
    }

    /// Loadout every session starts with: a level one hoe.
    #[must_use]
    pub const fn starter() -> Self {
        Self {
            levels: [1, 0, 0, 0],
        }
    }

    /// Current level of the weapon; zero means not owned.
    #[must_use]
    pub const fn level(&self, kind: WeaponKind) -> u8 {
        self.levels[kind.index()]
    }

    /// Weapons that can still be upgraded, in canonical order.
    #[must_use]
    pub fn upgradeable(&self) -> Vec<WeaponKind> {
        WeaponKind::ALL
            .into_iter()
            .filter(|kind| self.level(*kind) < MAX_WEAPON_LEVEL)
            .collect()
    }

    /// Raises the weapon by one level, returning the new level.
    ///
    /// Returns `None` without changes when the weapon is already maxed.
    pub fn raise(&mut self, kind: WeaponKind) -> Option<u8> {
        let slot = &mut self.levels[kind.index()];
        if *slot >= MAX_WEAPON_LEVEL {
            return None;
        }
        *slot += 1;
        Some(*slot)
    }

    /// Iterator over every weapon and its level.
    pub fn iter(&self) -> impl Iterator<Item = (WeaponKind, u8)> + '_ {
        WeaponKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.level(kind)))
    }
}

impl Default for Loadout {
    fn default() -> Self {
        Self::starter()
    }
}

/// Parameters for a single enemy spawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySpawn {
    /// Variant to create.
    pub kind: EnemyKind,
    /// World position of the new enemy.
    pub position: Vec2,
    /// Movement speed in units per frame.
    pub speed: f32,
}

/// Content of one treasure slot chosen before the box is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreasureSlot {
    /// Raise the given weapon by one level.
    Upgrade(WeaponKind),
    /// Nothing was upgradeable; award bonus score.
    Bonus,
}

/// Result of one treasure slot after it was applied to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreasureOutcome {
    /// A weapon reached a new level.
    Upgraded {
        /// Weapon that was raised.
        weapon: WeaponKind,
        /// Level reached.
        level: u8,
    },
    /// Bonus score was awarded instead of an upgrade.
    Bonus {
        /// Score added.
        score: u64,
    },
}

impl TreasureOutcome {
    /// Human readable summary of the outcome.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Upgraded { weapon, level } => format!(
                "{} reached Lv{} ({})",
                weapon.name(),
                level,
                Rarity::from_level(*level).name()
            ),
            Self::Bonus { score } => format!("Bonus gold! (+{score} points)"),
        }
    }

    /// Colour used to display the outcome.
    #[must_use]
    pub fn color(&self) -> &'static str {
        match self {
            Self::Upgraded { level, .. } => Rarity::from_level(*level).color(),
            Self::Bonus { .. } => TREASURE_BONUS_COLOR,
        }
    }
}

/// Everything revealed by opening one treasure box.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreasureReport {
    /// Tier rolled for the box.
    pub tier: TreasureTier,
    /// Per-slot results in the order they were applied.
    pub outcomes: Vec<TreasureOutcome>,
}

impl TreasureReport {
    /// Title shown above the outcomes.
    #[must_use]
    pub fn title(&self) -> &'static str {
        self.tier.title()
    }
}

/// What caused an upgrade prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeReason {
    /// The experience threshold was crossed in classic mode.
    LevelUp,
    /// Mature wheat was harvested in harvest mode.
    Harvest,
}

/// Upgrade offered to the player after a level-up or harvest.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UpgradeOption {
    /// Choice to send back when this option is picked.
    pub choice: UpgradeChoice,
    /// Short heading.
    pub title: String,
    /// Rich-text description including the rarity reached.
    pub description: String,
    /// Level the weapon will reach.
    pub next_level: u8,
    /// Rarity tier matching `next_level`.
    pub rarity: Rarity,
}

impl UpgradeOption {
    /// Builds the option for raising `weapon` from `current_level`.
    #[must_use]
    pub fn for_weapon(weapon: WeaponKind, current_level: u8) -> Self {
        let next_level = current_level.saturating_add(1).min(MAX_WEAPON_LEVEL);
        let rarity = Rarity::from_level(next_level);
        let verb = if current_level == 0 { "Acquire" } else { "Upgrade" };
        Self {
            choice: UpgradeChoice::Weapon(weapon),
            title: format!("{verb} {}", weapon.name()),
            description: format!("Rarity: {}<br/>{}", rarity.name(), weapon.description()),
            next_level,
            rarity,
        }
    }

    /// Sentinel shown when every weapon is already maxed.
    #[must_use]
    pub fn sentinel() -> Self {
        Self {
            choice: UpgradeChoice::Max,
            title: "Fully upgraded".to_owned(),
            description: "Every weapon has reached its final tier".to_owned(),
            next_level: MAX_WEAPON_LEVEL,
            rarity: Rarity::Mythic,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by one frame using the held movement keys.
    Tick {
        /// Movement keys held during the frame.
        keys: MoveKeys,
    },
    /// Starts or updates pointer steering towards a world position.
    SetPointerTarget {
        /// Destination in world coordinates.
        target: Vec2,
    },
    /// Stops pointer steering.
    ReleasePointer,
    /// Adds an enemy to the field.
    SpawnEnemy {
        /// Spawn parameters.
        spawn: EnemySpawn,
    },
    /// Adds the boss and removes every non-elite, non-boss enemy in one step.
    BeginBossEncounter {
        /// Spawn parameters of the boss.
        spawn: EnemySpawn,
    },
    /// Swings the hoe around the player.
    SwingHoe {
        /// Angle at which the visual sweep begins.
        start_angle: f32,
    },
    /// Throws a vegetable towards a point.
    LaunchVeggie {
        /// Point the vegetable is aimed at.
        target: Vec2,
        /// Cosmetic variety.
        skin: VeggieSkin,
    },
    /// Throws the shovel fan along the player's facing.
    ThrowShovels,
    /// Drops mushrooms that burst shortly afterwards.
    PlantMushrooms {
        /// World positions of each mushroom.
        sites: Vec<Vec2>,
    },
    /// Presents upgrade choices to the player.
    OfferUpgrades {
        /// Candidate choices; maxed weapons are discarded.
        choices: Vec<UpgradeChoice>,
        /// What triggered the prompt.
        reason: UpgradeReason,
    },
    /// Applies the player's choice from an upgrade prompt.
    ApplyUpgrade {
        /// Chosen upgrade.
        choice: UpgradeChoice,
    },
    /// Applies the contents of an opened treasure box.
    GrantTreasure {
        /// Tier rolled for the box.
        tier: TreasureTier,
        /// Slot contents in application order.
        slots: Vec<TreasureSlot>,
    },
    /// Plants wheat at the provided positions.
    PlantWheat {
        /// World positions, normally tile centres.
        sites: Vec<Vec2>,
    },
    /// Suspends the simulation on request of the presentation layer.
    Pause,
    /// Returns a resumable pause to play.
    Resume,
    /// Ends the session and cancels every scheduled event.
    Teardown,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced one frame.
    TimeAdvanced {
        /// Index of the frame that just completed.
        frame: u64,
    },
    /// Indicates that another in-game second elapsed.
    SecondElapsed {
        /// Total elapsed seconds.
        seconds: u32,
    },
    /// A weapon's cooldown completed during the frame.
    WeaponReady {
        /// Weapon that may fire.
        weapon: WeaponKind,
        /// Its current level.
        level: u8,
    },
    /// An enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Variant of the enemy.
        kind: EnemyKind,
        /// Spawn position.
        position: Vec2,
    },
    /// Ordinary enemies were removed to focus the boss encounter.
    CommonEnemiesCleared {
        /// Number of enemies removed.
        removed: usize,
    },
    /// An enemy's hit points reached zero and it was removed.
    EnemyDefeated {
        /// Identifier of the defeated enemy.
        enemy: EnemyId,
        /// Variant of the defeated enemy.
        kind: EnemyKind,
        /// Position at the moment of defeat.
        position: Vec2,
    },
    /// An experience gem was dropped.
    GemDropped {
        /// Position of the gem.
        position: Vec2,
    },
    /// A treasure box was dropped.
    TreasureDropped {
        /// Position of the box.
        position: Vec2,
    },
    /// The boss was defeated and its bounty awarded.
    BossDefeated {
        /// Score after the bounty.
        score: u64,
    },
    /// The player picked up a gem.
    GemCollected {
        /// Experience granted.
        value: u32,
    },
    /// The player crossed the experience threshold.
    LeveledUp {
        /// Level reached.
        level: u32,
    },
    /// A harvest-mode level-up asks for new wheat to be planted.
    WheatDue {
        /// Number of stalks to plant.
        count: u32,
    },
    /// The player picked up a treasure box.
    TreasureCollected,
    /// A treasure box was resolved.
    TreasureOpened {
        /// Everything the box granted.
        report: TreasureReport,
    },
    /// An upgrade prompt must be prepared.
    UpgradeDue {
        /// What triggered the prompt.
        reason: UpgradeReason,
    },
    /// Upgrade options are ready for the player.
    UpgradesOffered {
        /// Options in display order.
        options: Vec<UpgradeOption>,
        /// What triggered the prompt.
        reason: UpgradeReason,
    },
    /// A weapon gained a level.
    WeaponUpgraded {
        /// Weapon that was raised.
        weapon: WeaponKind,
        /// Level reached.
        level: u8,
    },
    /// An upgrade choice had no effect.
    UpgradeIgnored {
        /// The choice that was ignored.
        choice: UpgradeChoice,
    },
    /// Wheat was planted.
    WheatPlanted {
        /// Position of the new wheat.
        position: Vec2,
    },
    /// Mature wheat was harvested by the hoe.
    WheatHarvested {
        /// Position of the harvested wheat.
        position: Vec2,
    },
    /// Tiles were added to the cultivation grid.
    TilesCultivated {
        /// Number of tiles newly cultivated.
        added: usize,
    },
    /// The player took contact damage.
    PlayerDamaged {
        /// Damage taken this frame.
        amount: f32,
        /// Hit points remaining.
        hp: f32,
    },
    /// The session moved to a new play state.
    PlayStateChanged {
        /// State that became active.
        state: PlayState,
    },
    /// The player was defeated.
    GameOver,
    /// The stage was cleared after the boss fell.
    StageCleared {
        /// Final score.
        score: u64,
    },
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// World position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Facing angle in radians.
    pub facing: f32,
    /// Current hit points.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Experience accumulated towards the next level.
    pub exp: u32,
    /// Experience required for the next level.
    pub max_exp: u32,
    /// Current level.
    pub level: u32,
    /// Current score.
    pub score: u64,
    /// Whether pointer steering is active.
    pub steering: bool,
    /// Weapon levels.
    pub loadout: Loadout,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// World position.
    pub position: Vec2,
    /// Collision radius.
    pub radius: f32,
    /// Current hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Idle animation phase.
    pub wobble: f32,
    /// `1.0` when facing right, `-1.0` when facing left.
    pub facing: f32,
}

/// Read-only snapshot describing all enemies on the field.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Number of enemies captured.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a wheat stalk used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheatSnapshot {
    /// World position.
    pub position: Vec2,
    /// Frames since planting.
    pub age: u32,
    /// Whether the wheat can be harvested.
    pub mature: bool,
    /// Whether the wheat was already harvested.
    pub harvested: bool,
}

/// Read-only view over the cultivated tiles.
#[derive(Clone, Copy, Debug)]
pub struct CultivationView<'a> {
    tiles: &'a BTreeSet<FieldTile>,
}

impl<'a> CultivationView<'a> {
    /// Captures a view backed by the provided tile set.
    #[must_use]
    pub fn new(tiles: &'a BTreeSet<FieldTile>) -> Self {
        Self { tiles }
    }

    /// Whether the tile is cultivated.
    #[must_use]
    pub fn contains(&self, tile: FieldTile) -> bool {
        self.tiles.contains(&tile)
    }

    /// Iterator over cultivated tiles in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = FieldTile> + 'a {
        self.tiles.iter().copied()
    }

    /// Number of cultivated tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether no tile is cultivated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
