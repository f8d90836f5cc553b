#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns ready weapons into deterministic fire commands.

use glam::Vec2;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scarecrow_core::{
    unit_from_heading, Command, EnemyId, EnemyView, Event, VeggieSkin, WeaponKind,
};

/// Furthest distance at which the veggie picks a target.
pub const VEGGIE_ACQUISITION_RANGE: f32 = 600.0;

/// Radius of the disc around the player where mushrooms land.
pub const MUSHROOM_SCATTER_RADIUS: f32 = 150.0;

/// Configuration parameters required to construct the armory.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Weapon firing system. Cooldowns live in the world; this system only
/// decides where each ready weapon is aimed.
#[derive(Debug)]
pub struct Armory {
    rng: ChaCha8Rng,
}

impl Armory {
    /// Creates a new armory using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes `WeaponReady` events and emits the matching fire commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        player_position: Vec2,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            let Event::WeaponReady { weapon, level } = event else {
                continue;
            };
            match weapon {
                WeaponKind::Hoe => out.push(Command::SwingHoe {
                    start_angle: self.rng.gen_range(0.0..std::f32::consts::TAU),
                }),
                WeaponKind::Veggie => {
                    if let Some(target) = nearest_enemy(player_position, enemies) {
                        let skin = VeggieSkin::ALL
                            .choose(&mut self.rng)
                            .copied()
                            .unwrap_or(VeggieSkin::Carrot);
                        out.push(Command::LaunchVeggie { target, skin });
                    }
                }
                WeaponKind::Mushroom => {
                    let count = WeaponKind::Mushroom.profile(*level).count;
                    let sites = (0..count)
                        .map(|_| {
                            let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
                            let reach = self.rng.gen_range(0.0..MUSHROOM_SCATTER_RADIUS);
                            player_position + unit_from_heading(angle) * reach
                        })
                        .collect();
                    out.push(Command::PlantMushrooms { sites });
                }
                WeaponKind::Shovel => out.push(Command::ThrowShovels),
            }
        }
    }
}

/// Position of the closest enemy inside the veggie's acquisition range.
///
/// Ties on distance resolve towards the smaller enemy id.
#[must_use]
pub fn nearest_enemy(origin: Vec2, enemies: &EnemyView) -> Option<Vec2> {
    let mut best: Option<BestCandidate> = None;
    for enemy in enemies.iter() {
        let distance_sq = enemy.position.distance_squared(origin);
        if distance_sq >= VEGGIE_ACQUISITION_RANGE * VEGGIE_ACQUISITION_RANGE {
            continue;
        }
        let current = BestCandidate {
            distance_sq,
            enemy: enemy.id,
            position: enemy.position,
        };
        match &mut best {
            Some(existing) => {
                if current.precedes(existing) {
                    *existing = current;
                }
            }
            None => best = Some(current),
        }
    }
    best.map(|candidate| candidate.position)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    enemy: EnemyId,
    position: Vec2,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance_sq != other.distance_sq {
            return self.distance_sq < other.distance_sq;
        }
        self.enemy < other.enemy
    }
}
