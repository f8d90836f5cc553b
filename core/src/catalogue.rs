//! Static gameplay tables: weapons, enemy variants, rarity tiers and treasure tiers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest level any weapon can reach.
pub const MAX_WEAPON_LEVEL: u8 = 5;

/// Key reserved for the "nothing left to upgrade" option.
pub const MAX_SENTINEL_KEY: &str = "max";

/// Score awarded for a treasure slot that found nothing to upgrade.
pub const TREASURE_BONUS_SCORE: u64 = 500;

/// Display colour used for treasure bonus outcomes.
pub const TREASURE_BONUS_COLOR: &str = "#facc15";

/// The four weapon archetypes carried by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Self-centred melee sweep that also tills the ground.
    Hoe,
    /// Ranged throw at the nearest enemy.
    Veggie,
    /// Scattered mushrooms that burst after a short fuse.
    Mushroom,
    /// Piercing shovels thrown along the facing direction.
    Shovel,
}

impl WeaponKind {
    /// Every weapon in canonical order.
    pub const ALL: [WeaponKind; 4] = [
        WeaponKind::Hoe,
        WeaponKind::Veggie,
        WeaponKind::Mushroom,
        WeaponKind::Shovel,
    ];

    /// Stable key used by the presentation layer to refer to the weapon.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Hoe => "hoe",
            Self::Veggie => "veggie",
            Self::Mushroom => "mushroom",
            Self::Shovel => "shovel",
        }
    }

    /// Display name of the weapon.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Hoe => "Great Hoe Sweep",
            Self::Veggie => "Veggie Toss",
            Self::Mushroom => "Blast Mushroom",
            Self::Shovel => "Shovel Charge",
        }
    }

    /// One-line description of what the weapon does.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Hoe => "Sweeps away every enemy around you",
            Self::Veggie => "Throws a vegetable at the nearest enemy",
            Self::Mushroom => "Drops mushrooms around you that explode",
            Self::Shovel => "Hurls shovels in the direction you face",
        }
    }

    /// Position of the weapon inside [`WeaponKind::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Hoe => 0,
            Self::Veggie => 1,
            Self::Mushroom => 2,
            Self::Shovel => 3,
        }
    }

    /// Resolves a weapon from its stable key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    /// Combat figures for the weapon at the provided level.
    ///
    /// Level zero yields the level-one figures scaled from a zero level; callers
    /// never fire unowned weapons.
    #[must_use]
    pub fn profile(self, level: u8) -> WeaponProfile {
        let level = i32::from(level.min(MAX_WEAPON_LEVEL));
        let scale = level as f32;
        match self {
            Self::Hoe => WeaponProfile {
                cooldown_frames: cooldown(30, 90 - level * 10),
                damage: 20.0 + scale * 10.0,
                radius: 70.0 + scale * 15.0,
                pierce: 0,
                count: 1,
                knockback: if level >= 3 { Some(HOE_KNOCKBACK) } else { None },
            },
            Self::Veggie => WeaponProfile {
                cooldown_frames: cooldown(10, 60 - level * 8),
                damage: 15.0 + scale * 8.0,
                radius: VEGGIE_RADIUS,
                pierce: if level >= 3 { (level - 2) as u32 } else { 0 },
                count: 1,
                knockback: None,
            },
            Self::Mushroom => WeaponProfile {
                cooldown_frames: cooldown(40, 150 - level * 20),
                damage: 30.0 + scale * 15.0,
                radius: 60.0 + scale * 10.0,
                pierce: 0,
                count: 2 + (level / 2) as u32,
                knockback: None,
            },
            Self::Shovel => WeaponProfile {
                cooldown_frames: cooldown(40, 120 - level * 15),
                damage: 25.0 + scale * 12.0,
                radius: SHOVEL_RADIUS,
                pierce: 2 + level as u32,
                count: 1 + (level / 3) as u32,
                knockback: None,
            },
        }
    }
}

const HOE_KNOCKBACK: f32 = 40.0;
const VEGGIE_RADIUS: f32 = 8.0;
const SHOVEL_RADIUS: f32 = 15.0;

fn cooldown(floor: i32, value: i32) -> u32 {
    floor.max(value).unsigned_abs()
}

/// Level-dependent figures describing a single weapon.
///
/// `radius` is the sweep reach for the hoe, the projectile radius for thrown
/// weapons and the blast radius for mushrooms. `count` is the number of
/// projectiles or mushrooms released per activation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponProfile {
    /// Frames that must accumulate between activations.
    pub cooldown_frames: u32,
    /// Damage dealt to each enemy struck.
    pub damage: f32,
    /// Reach, projectile radius or blast radius depending on the weapon.
    pub radius: f32,
    /// Additional enemies a projectile may strike after the first.
    pub pierce: u32,
    /// Number of projectiles or blasts released per activation.
    pub count: u32,
    /// Push-back distance applied to struck enemies, if any.
    pub knockback: Option<f32>,
}

/// Choice delivered by the presentation layer after a level-up prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeChoice {
    /// Raise the given weapon by one level.
    Weapon(WeaponKind),
    /// Sentinel offered when every weapon is maxed; applying it does nothing.
    Max,
}

impl UpgradeChoice {
    /// Stable key of the choice.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Weapon(kind) => kind.key(),
            Self::Max => MAX_SENTINEL_KEY,
        }
    }

    /// Parses a key received from the presentation layer.
    pub fn parse(key: &str) -> Result<Self, UnknownUpgradeKey> {
        if key == MAX_SENTINEL_KEY {
            return Ok(Self::Max);
        }
        WeaponKind::from_key(key)
            .map(Self::Weapon)
            .ok_or_else(|| UnknownUpgradeKey(key.to_owned()))
    }
}

/// Raised when an upgrade key matches neither a weapon nor the sentinel.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown upgrade key `{0}`")]
pub struct UnknownUpgradeKey(pub String);

/// Ordinal quality tier shared by weapon levels and treasure rewards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    /// Weapon not yet acquired.
    Unowned,
    /// First tier.
    Common,
    /// Second tier.
    Rare,
    /// Third tier.
    Epic,
    /// Fourth tier.
    Legendary,
    /// Fifth and final tier.
    Mythic,
}

impl Rarity {
    /// Rarity reached by a weapon at the provided level, saturating at [`Rarity::Mythic`].
    #[must_use]
    pub const fn from_level(level: u8) -> Self {
        match level {
            0 => Self::Unowned,
            1 => Self::Common,
            2 => Self::Rare,
            3 => Self::Epic,
            4 => Self::Legendary,
            _ => Self::Mythic,
        }
    }

    /// Display label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unowned => "Unowned",
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Legendary => "Legendary",
            Self::Mythic => "Mythic",
        }
    }

    /// Display colour as a hex string.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::Unowned => "#aaaaaa",
            Self::Common => "#10B981",
            Self::Rare => "#3B82F6",
            Self::Epic => "#8B5CF6",
            Self::Legendary => "#F59E0B",
            Self::Mythic => "#06B6D4",
        }
    }
}

/// Reward tier selected when a treasure box is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreasureTier {
    /// One upgrade slot.
    Common,
    /// Three upgrade slots.
    Rare,
    /// Five upgrade slots.
    Legendary,
}

impl TreasureTier {
    /// Maps a uniform roll in `[0, 1)` onto a tier.
    #[must_use]
    pub fn from_roll(roll: f32) -> Self {
        if roll <= 0.60 {
            Self::Common
        } else if roll <= 0.90 {
            Self::Rare
        } else {
            Self::Legendary
        }
    }

    /// Number of upgrade slots granted by the tier.
    #[must_use]
    pub const fn slots(self) -> usize {
        match self {
            Self::Common => 1,
            Self::Rare => 3,
            Self::Legendary => 5,
        }
    }

    /// Rarity used to colour the box.
    #[must_use]
    pub const fn rarity(self) -> Rarity {
        match self {
            Self::Common => Rarity::Common,
            Self::Rare => Rarity::Rare,
            Self::Legendary => Rarity::Legendary,
        }
    }

    /// Title shown when the box opens.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Common => "Green chest (1 upgrade)",
            Self::Rare => "Blue chest (3 upgrades)",
            Self::Legendary => "Gold chest (5 upgrades!)",
        }
    }
}

/// Closed set of enemy variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow, weak crawler that makes up most waves.
    Worm,
    /// Fast, fragile flyer that becomes common over time.
    Crow,
    /// Tough mini-boss that drops treasure.
    Elite,
    /// Stage boss; defeating it clears the stage.
    Boss,
}

impl EnemyKind {
    /// Stat table for the variant.
    #[must_use]
    pub const fn profile(self) -> EnemyProfile {
        match self {
            Self::Worm => EnemyProfile {
                radius: 12.0,
                base_speed: 1.0,
                speed_jitter: 0.5,
                hp: 10.0,
                damage: 5.0,
            },
            Self::Crow => EnemyProfile {
                radius: 15.0,
                base_speed: 2.0,
                speed_jitter: 0.5,
                hp: 5.0,
                damage: 8.0,
            },
            Self::Elite => EnemyProfile {
                radius: 20.0,
                base_speed: 1.6,
                speed_jitter: 0.0,
                hp: 120.0,
                damage: 15.0,
            },
            Self::Boss => EnemyProfile {
                radius: 45.0,
                base_speed: 1.4,
                speed_jitter: 0.0,
                hp: 1500.0,
                damage: 25.0,
            },
        }
    }

    /// Visual description consumed by renderers.
    #[must_use]
    pub const fn appearance(self) -> Appearance {
        match self {
            Self::Worm => Appearance {
                color: "#84cc16",
                shape: BodyShape::Segmented,
                sway: 3.0,
            },
            Self::Crow => Appearance {
                color: "#1f2937",
                shape: BodyShape::Winged,
                sway: 0.0,
            },
            Self::Elite => Appearance {
                color: "#ea580c",
                shape: BodyShape::Segmented,
                sway: 5.0,
            },
            Self::Boss => Appearance {
                color: "#78350f",
                shape: BodyShape::Hulking,
                sway: 5.0,
            },
        }
    }

    /// Whether the variant counts as an elite.
    #[must_use]
    pub const fn is_elite(self) -> bool {
        matches!(self, Self::Elite)
    }

    /// Whether the variant is the stage boss.
    #[must_use]
    pub const fn is_boss(self) -> bool {
        matches!(self, Self::Boss)
    }

    /// Elites and bosses leave a treasure box instead of an experience gem.
    #[must_use]
    pub const fn drops_treasure(self) -> bool {
        self.is_elite() || self.is_boss()
    }
}

/// Stats assigned to an enemy when it spawns.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    /// Collision radius.
    pub radius: f32,
    /// Minimum movement speed in units per frame.
    pub base_speed: f32,
    /// Upper bound of the random speed bonus added at spawn.
    pub speed_jitter: f32,
    /// Starting hit points.
    pub hp: f32,
    /// Contact damage per second.
    pub damage: f32,
}

impl EnemyProfile {
    /// Speed for a spawn given a uniform sample in `[0, 1)`.
    #[must_use]
    pub fn speed_for(&self, sample: f32) -> f32 {
        self.base_speed + sample.clamp(0.0, 1.0) * self.speed_jitter
    }
}

/// Presentation hints for an enemy variant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Appearance {
    /// Body colour as a hex string.
    pub color: &'static str,
    /// Silhouette used when drawing.
    pub shape: BodyShape,
    /// Amplitude of the idle sway driven by the wobble phase.
    pub sway: f32,
}

/// Silhouettes available to renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyShape {
    /// Crawling segmented body.
    Segmented,
    /// Bird with flapping wings.
    Winged,
    /// Oversized bouncing body.
    Hulking,
}

/// Cosmetic variety for thrown vegetables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VeggieSkin {
    /// Orange carrot.
    Carrot,
    /// White radish.
    Radish,
    /// Green cucumber.
    Cucumber,
}

impl VeggieSkin {
    /// All skins in canonical order.
    pub const ALL: [VeggieSkin; 3] = [Self::Carrot, Self::Radish, Self::Cucumber];
}
