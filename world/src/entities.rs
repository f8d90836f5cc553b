//! Entity models stored inside the world: plain data plus per-frame behaviour.

use std::collections::BTreeSet;

use glam::Vec2;
use scarecrow_core::{
    direction_between, distance, heading, EnemyId, EnemyKind, EnemySpawn, MoveKeys, VeggieSkin,
};

pub(crate) const PLAYER_RADIUS: f32 = 20.0;
pub(crate) const PLAYER_SPEED: f32 = 3.5;
pub(crate) const PLAYER_MAX_HP: f32 = 100.0;
pub(crate) const STARTING_MAX_EXP: u32 = 10;

const GEM_RADIUS: f32 = 5.0;
const GEM_VALUE: u32 = 1;
const TREASURE_BOX_RADIUS: f32 = 20.0;
const WOBBLE_STEP: f32 = 0.1;
const EXPLOSION_LIFETIME: u32 = 20;
const EXPLOSION_FUSE: u32 = 2;
const HOE_EFFECT_LIFETIME: u32 = 15;
const HOE_SWING: f32 = std::f32::consts::PI * 1.2;

#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) speed: f32,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) exp: u32,
    pub(crate) max_exp: u32,
    pub(crate) level: u32,
    pub(crate) score: u64,
    pub(crate) facing: f32,
    pub(crate) target: Vec2,
    pub(crate) steering: bool,
}

impl Player {
    pub(crate) fn spawn_at(position: Vec2) -> Self {
        Self {
            position,
            radius: PLAYER_RADIUS,
            speed: PLAYER_SPEED,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            exp: 0,
            max_exp: STARTING_MAX_EXP,
            level: 1,
            score: 0,
            facing: 0.0,
            target: position,
            steering: false,
        }
    }

    /// Position the player wants to reach this frame.
    ///
    /// Held keys take priority over pointer steering and cancel it. Pointer
    /// steering snaps onto the target once it is within a single step.
    pub(crate) fn intended_position(&mut self, keys: MoveKeys) -> Vec2 {
        let axis = keys.axis();
        if axis != Vec2::ZERO {
            self.steering = false;
            self.facing = heading(axis);
            return self.position + axis.normalize_or_zero() * self.speed;
        }

        if !self.steering {
            return self.position;
        }

        let offset = self.target - self.position;
        let remaining = offset.length();
        if remaining > self.speed {
            self.facing = heading(offset);
            self.position + offset / remaining * self.speed
        } else {
            self.steering = false;
            self.target
        }
    }

    pub(crate) fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) speed: f32,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) damage: f32,
    pub(crate) wobble: f32,
    pub(crate) facing: f32,
}

impl Enemy {
    pub(crate) fn from_spawn(id: EnemyId, spawn: EnemySpawn) -> Self {
        let profile = spawn.kind.profile();
        Self {
            id,
            kind: spawn.kind,
            position: spawn.position,
            radius: profile.radius,
            speed: spawn.speed,
            hp: profile.hp,
            max_hp: profile.hp,
            damage: profile.damage,
            wobble: 0.0,
            facing: 1.0,
        }
    }

    /// Moves straight towards the target at the enemy's speed.
    pub(crate) fn pursue(&mut self, target: Vec2) {
        let direction = direction_between(self.position, target);
        if direction != Vec2::ZERO {
            self.position += direction * self.speed;
            self.facing = if direction.x > 0.0 { 1.0 } else { -1.0 };
        }
        self.wobble += WOBBLE_STEP;
    }

    pub(crate) fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }

    pub(crate) fn take_damage(&mut self, amount: f32) {
        self.hp -= amount.max(0.0);
    }

    pub(crate) fn overlaps(&self, position: Vec2, radius: f32) -> bool {
        distance(self.position, position) < self.radius + radius
    }
}

#[derive(Clone, Debug)]
pub(crate) struct ExpGem {
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) value: u32,
}

impl ExpGem {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            radius: GEM_RADIUS,
            value: GEM_VALUE,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct TreasureBox {
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) wobble: f32,
}

impl TreasureBox {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            radius: TREASURE_BOX_RADIUS,
            wobble: 0.0,
        }
    }

    pub(crate) fn idle(&mut self) {
        self.wobble += WOBBLE_STEP;
    }
}

/// Cosmetic identity of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileSkin {
    /// Thrown vegetable.
    Veggie(VeggieSkin),
    /// Thrown shovel pointing along its heading.
    Shovel {
        /// Heading in radians.
        angle: f32,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) skin: ProjectileSkin,
    pub(crate) position: Vec2,
    pub(crate) velocity: Vec2,
    pub(crate) damage: f32,
    pub(crate) radius: f32,
    pub(crate) pierce: u32,
    pub(crate) hit: BTreeSet<EnemyId>,
    /// Frames left. `None` flies until pierce or range runs out.
    pub(crate) ttl: Option<u32>,
}

impl Projectile {
    pub(crate) fn new(
        skin: ProjectileSkin,
        position: Vec2,
        velocity: Vec2,
        damage: f32,
        radius: f32,
        pierce: u32,
        ttl: Option<u32>,
    ) -> Self {
        Self {
            skin,
            position,
            velocity,
            damage,
            radius,
            pierce,
            hit: BTreeSet::new(),
            ttl,
        }
    }

    pub(crate) fn advance(&mut self) {
        self.position += self.velocity;
        if let Some(ttl) = self.ttl.as_mut() {
            *ttl = ttl.saturating_sub(1);
        }
    }

    pub(crate) fn expired(&self) -> bool {
        self.ttl == Some(0)
    }

    /// Strikes the enemy if it overlaps and was not struck before.
    ///
    /// Returns `Some(spent)` when a hit landed, where `spent` reports whether
    /// the projectile has no pierce left and must be removed.
    pub(crate) fn strike(&mut self, enemy: &mut Enemy) -> Option<bool> {
        if self.hit.contains(&enemy.id) || !enemy.overlaps(self.position, self.radius) {
            return None;
        }
        enemy.take_damage(self.damage);
        let _ = self.hit.insert(enemy.id);
        if self.pierce > 0 {
            self.pierce -= 1;
            Some(false)
        } else {
            Some(true)
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Explosion {
    pub(crate) position: Vec2,
    pub(crate) radius: f32,
    pub(crate) damage: f32,
    pub(crate) life: u32,
    pub(crate) hit: BTreeSet<EnemyId>,
}

impl Explosion {
    pub(crate) fn new(position: Vec2, radius: f32, damage: f32) -> Self {
        Self {
            position,
            radius,
            damage,
            life: EXPLOSION_LIFETIME,
            hit: BTreeSet::new(),
        }
    }

    /// Advances the blast by one frame, dealing damage only on the fuse frame.
    pub(crate) fn update(&mut self, enemies: &mut [Enemy]) {
        self.life = self.life.saturating_sub(1);
        if self.life != EXPLOSION_LIFETIME - EXPLOSION_FUSE {
            return;
        }
        for enemy in enemies.iter_mut().filter(|enemy| !enemy.is_defeated()) {
            if self.hit.contains(&enemy.id) || !enemy.overlaps(self.position, self.radius) {
                continue;
            }
            enemy.take_damage(self.damage);
            let _ = self.hit.insert(enemy.id);
        }
    }

    pub(crate) fn progress(&self) -> f32 {
        1.0 - self.life as f32 / EXPLOSION_LIFETIME as f32
    }

    pub(crate) fn finished(&self) -> bool {
        self.life == 0
    }
}

#[derive(Clone, Debug)]
pub(crate) struct HoeEffect {
    pub(crate) origin: Vec2,
    pub(crate) radius: f32,
    pub(crate) level: u8,
    pub(crate) start_angle: f32,
    pub(crate) life: u32,
}

impl HoeEffect {
    pub(crate) fn new(origin: Vec2, radius: f32, level: u8, start_angle: f32) -> Self {
        Self {
            origin,
            radius,
            level,
            start_angle,
            life: HOE_EFFECT_LIFETIME,
        }
    }

    pub(crate) fn update(&mut self) {
        self.life = self.life.saturating_sub(1);
    }

    /// Angle the blade has reached at the current point of the swing.
    pub(crate) fn current_angle(&self) -> f32 {
        let progress = 1.0 - self.life as f32 / HOE_EFFECT_LIFETIME as f32;
        self.start_angle + HOE_SWING * progress
    }

    pub(crate) fn finished(&self) -> bool {
        self.life == 0
    }
}

pub(crate) const WHEAT_MATURITY_FRAMES: u32 = 600;
const WHEAT_HARVEST_GRACE_FRAMES: u64 = 30;

#[derive(Clone, Debug)]
pub(crate) struct Wheat {
    pub(crate) position: Vec2,
    pub(crate) age: u32,
    pub(crate) maturity: u32,
    pub(crate) harvested_at: Option<u64>,
}

impl Wheat {
    pub(crate) fn new(position: Vec2) -> Self {
        Self {
            position,
            age: 0,
            maturity: WHEAT_MATURITY_FRAMES,
            harvested_at: None,
        }
    }

    pub(crate) fn grow(&mut self) {
        if self.harvested_at.is_none() {
            self.age = self.age.saturating_add(1);
        }
    }

    pub(crate) fn is_mature(&self) -> bool {
        self.age >= self.maturity
    }

    pub(crate) fn is_harvestable(&self) -> bool {
        self.harvested_at.is_none() && self.is_mature()
    }

    pub(crate) fn spent(&self, frame: u64) -> bool {
        self.harvested_at
            .map_or(false, |at| frame.saturating_sub(at) >= WHEAT_HARVEST_GRACE_FRAMES)
    }
}
