#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Scarecrow Survivors.

mod arsenal;
mod cultivation;
mod entities;
mod schedule;

use glam::Vec2;
use scarecrow_core::{
    direction_between, distance, unit_from_heading, Command, EnemyId, EnemySpawn, Event,
    MoveKeys, PauseReason, PlayState, ProgressionMode, TreasureOutcome, TreasureReport,
    TreasureSlot, TreasureTier, UpgradeChoice, UpgradeOption, UpgradeReason, VeggieSkin,
    WeaponKind, FRAMES_PER_SECOND, MAX_WEAPON_LEVEL, TREASURE_BONUS_SCORE,
};

use arsenal::Arsenal;
use cultivation::CultivationGrid;
use entities::{
    Enemy, ExpGem, Explosion, HoeEffect, Player, Projectile, TreasureBox, Wheat,
};
use schedule::{Deferred, ScheduledQueue};

pub use entities::ProjectileSkin;

/// Frames between the boss falling and the stage being declared clear.
pub const DEFAULT_STAGE_CLEAR_DELAY_FRAMES: u64 = 120;

/// Frames between resuming and the next queued harvest prompt.
pub const DEFAULT_HARVEST_PROMPT_DELAY_FRAMES: u64 = 18;

const SPAWN_POINT: Vec2 = Vec2::ZERO;
const LEVEL_UP_HEAL: f32 = 20.0;
const GEM_MAGNET_RANGE: f32 = 80.0;
const GEM_PULL_SPEED: f32 = 6.0;
const GEM_SCORE: u64 = 10;
const CONTACT_DAMAGE_SCALE: f32 = 0.05;
const CONTACT_PUSH: f32 = 1.0;
const PROJECTILE_RANGE: f32 = 1000.0;
const VEGGIE_SPEED: f32 = 10.0;
const SHOVEL_SPEED: f32 = 12.0;
const SHOVEL_FAN_STEP: f32 = 0.2;
const BOSS_BOUNTY: u64 = 5000;
const MAX_OFFERED_UPGRADES: usize = 3;

/// Tunables fixed for the lifetime of a world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// How crossing the experience threshold rewards the player.
    pub mode: ProgressionMode,
    /// Frames between the boss falling and the stage clearing.
    pub stage_clear_delay_frames: u64,
    /// Frames between a resume and the next queued harvest prompt.
    pub harvest_prompt_delay_frames: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            mode: ProgressionMode::Classic,
            stage_clear_delay_frames: DEFAULT_STAGE_CLEAR_DELAY_FRAMES,
            harvest_prompt_delay_frames: DEFAULT_HARVEST_PROMPT_DELAY_FRAMES,
        }
    }
}

/// Represents the authoritative Scarecrow Survivors world state.
#[derive(Debug)]
pub struct World {
    config: WorldConfig,
    state: PlayState,
    frame: u64,
    elapsed_seconds: u32,
    player: Player,
    arsenal: Arsenal,
    enemies: Vec<Enemy>,
    next_enemy_id: u32,
    gems: Vec<ExpGem>,
    treasure_boxes: Vec<TreasureBox>,
    projectiles: Vec<Projectile>,
    explosions: Vec<Explosion>,
    hoe_effects: Vec<HoeEffect>,
    wheat: Vec<Wheat>,
    field: CultivationGrid,
    schedule: ScheduledQueue,
    pending_harvests: u32,
}

impl World {
    /// Creates a classic-mode world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    /// Creates a world using the provided configuration.
    #[must_use]
    pub fn with_config(config: WorldConfig) -> Self {
        Self {
            config,
            state: PlayState::Playing,
            frame: 0,
            elapsed_seconds: 0,
            player: Player::spawn_at(SPAWN_POINT),
            arsenal: Arsenal::default(),
            enemies: Vec::new(),
            next_enemy_id: 0,
            gems: Vec::new(),
            treasure_boxes: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            hoe_effects: Vec::new(),
            wheat: Vec::new(),
            field: CultivationGrid::seeded_around(SPAWN_POINT),
            schedule: ScheduledQueue::default(),
            pending_harvests: 0,
        }
    }

    fn harvest_mode(&self) -> bool {
        self.config.mode == ProgressionMode::Harvest
    }

    fn set_state(&mut self, state: PlayState, out_events: &mut Vec<Event>) {
        log::debug!("play state {:?} -> {:?}", self.state, state);
        self.state = state;
        out_events.push(Event::PlayStateChanged { state });
    }

    fn advance_frame(&mut self, keys: MoveKeys, out_events: &mut Vec<Event>) {
        self.frame = self.frame.saturating_add(1);
        out_events.push(Event::TimeAdvanced { frame: self.frame });
        if self.frame % FRAMES_PER_SECOND == 0 {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(1);
            out_events.push(Event::SecondElapsed {
                seconds: self.elapsed_seconds,
            });
        }

        self.move_player(keys);
        self.advance_projectiles();
        self.reap_defeated(out_events);
        self.advance_explosions();
        self.reap_defeated(out_events);
        self.advance_enemies(out_events);
        if self.state == PlayState::GameOver {
            return;
        }
        self.collect_gems(out_events);
        self.collect_treasure(out_events);
        self.age_effects();
        self.run_due_events(out_events);

        if self.state.is_playing() {
            self.arsenal
                .charge(!self.enemies.is_empty(), out_events);
        }
    }

    fn move_player(&mut self, keys: MoveKeys) {
        let candidate = self.player.intended_position(keys);
        if !self.harvest_mode() {
            self.player.position = candidate;
            return;
        }
        let (accepted, rejected) =
            self.field
                .resolve_move(self.player.position, candidate, self.player.radius);
        if rejected {
            self.player.steering = false;
        }
        self.player.position = accepted;
    }

    fn advance_projectiles(&mut self) {
        let anchor = self.player.position;
        let enemies = &mut self.enemies;
        self.projectiles.retain_mut(|projectile| {
            projectile.advance();
            if projectile.expired() || distance(projectile.position, anchor) > PROJECTILE_RANGE {
                return false;
            }
            for enemy in enemies.iter_mut().filter(|enemy| !enemy.is_defeated()) {
                if projectile.strike(enemy) == Some(true) {
                    return false;
                }
            }
            true
        });
    }

    fn advance_explosions(&mut self) {
        for explosion in self.explosions.iter_mut() {
            explosion.update(&mut self.enemies);
        }
        self.explosions.retain(|explosion| !explosion.finished());
    }

    /// Removes every enemy whose hit points reached zero and drops its loot.
    fn reap_defeated(&mut self, out_events: &mut Vec<Event>) {
        if !self.enemies.iter().any(Enemy::is_defeated) {
            return;
        }
        let (fallen, standing): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.enemies)
            .into_iter()
            .partition(Enemy::is_defeated);
        self.enemies = standing;

        for enemy in fallen {
            out_events.push(Event::EnemyDefeated {
                enemy: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
            });
            if enemy.kind.drops_treasure() {
                self.treasure_boxes.push(TreasureBox::new(enemy.position));
                out_events.push(Event::TreasureDropped {
                    position: enemy.position,
                });
            } else {
                self.gems.push(ExpGem::new(enemy.position));
                out_events.push(Event::GemDropped {
                    position: enemy.position,
                });
            }
            if enemy.kind.is_boss() {
                self.player.score = self.player.score.saturating_add(BOSS_BOUNTY);
                log::info!(
                    "boss defeated at frame {}, score {}",
                    self.frame,
                    self.player.score
                );
                out_events.push(Event::BossDefeated {
                    score: self.player.score,
                });
                self.schedule.schedule(
                    self.frame.saturating_add(self.config.stage_clear_delay_frames),
                    Deferred::StageClear,
                );
            }
        }
    }

    fn advance_enemies(&mut self, out_events: &mut Vec<Event>) {
        let target = self.player.position;
        for enemy in self.enemies.iter_mut() {
            enemy.pursue(target);
        }

        for index in 0..self.enemies.len() {
            let (touching, damage, from) = {
                let enemy = &self.enemies[index];
                (
                    enemy.overlaps(self.player.position, self.player.radius),
                    enemy.damage,
                    enemy.position,
                )
            };
            if !touching {
                continue;
            }

            let amount = damage * CONTACT_DAMAGE_SCALE;
            self.player.hp = (self.player.hp - amount).max(0.0);
            out_events.push(Event::PlayerDamaged {
                amount,
                hp: self.player.hp,
            });
            if self.player.hp <= 0.0 {
                log::info!("player defeated at frame {}", self.frame);
                self.set_state(PlayState::GameOver, out_events);
                out_events.push(Event::GameOver);
                return;
            }

            let pushed =
                self.player.position + direction_between(from, self.player.position) * CONTACT_PUSH;
            if !self.harvest_mode() || self.field.supports(pushed, self.player.radius) {
                self.player.position = pushed;
            }
        }
    }

    fn collect_gems(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.gems.len() && self.state.is_playing() {
            let anchor = self.player.position;
            let gap = distance(self.gems[index].position, anchor);
            if gap < self.player.radius {
                let gem = self.gems.remove(index);
                self.player.exp = self.player.exp.saturating_add(gem.value);
                self.player.score = self.player.score.saturating_add(GEM_SCORE);
                out_events.push(Event::GemCollected { value: gem.value });
                while self.player.exp >= self.player.max_exp {
                    self.player.exp -= self.player.max_exp;
                    self.level_up(out_events);
                }
                continue;
            }
            if gap < GEM_MAGNET_RANGE {
                let gem = &mut self.gems[index];
                gem.position += direction_between(gem.position, anchor) * GEM_PULL_SPEED;
            }
            index += 1;
        }
    }

    fn level_up(&mut self, out_events: &mut Vec<Event>) {
        self.player.level = self.player.level.saturating_add(1);
        self.player.max_exp = self.player.max_exp.saturating_mul(3) / 2;
        self.player.heal(LEVEL_UP_HEAL);
        out_events.push(Event::LeveledUp {
            level: self.player.level,
        });

        match self.config.mode {
            ProgressionMode::Classic => {
                self.player.steering = false;
                self.set_state(PlayState::Paused(PauseReason::UpgradeChoice), out_events);
                out_events.push(Event::UpgradeDue {
                    reason: UpgradeReason::LevelUp,
                });
            }
            ProgressionMode::Harvest => out_events.push(Event::WheatDue {
                count: 2 + self.player.level / 2,
            }),
        }
    }

    fn collect_treasure(&mut self, out_events: &mut Vec<Event>) {
        if !self.state.is_playing() {
            return;
        }
        let anchor = self.player.position;
        let reach = self.player.radius;
        let Some(index) = self
            .treasure_boxes
            .iter()
            .position(|chest| distance(chest.position, anchor) < reach + chest.radius)
        else {
            return;
        };
        let _ = self.treasure_boxes.remove(index);
        self.player.steering = false;
        self.set_state(PlayState::Paused(PauseReason::Treasure), out_events);
        out_events.push(Event::TreasureCollected);
    }

    fn age_effects(&mut self) {
        for chest in self.treasure_boxes.iter_mut() {
            chest.idle();
        }
        for effect in self.hoe_effects.iter_mut() {
            effect.update();
        }
        self.hoe_effects.retain(|effect| !effect.finished());

        let frame = self.frame;
        for wheat in self.wheat.iter_mut() {
            wheat.grow();
        }
        self.wheat.retain(|wheat| !wheat.spent(frame));
    }

    fn run_due_events(&mut self, out_events: &mut Vec<Event>) {
        for deferred in self.schedule.drain_due(self.frame) {
            match deferred {
                Deferred::StageClear => {
                    if self.state.is_terminal() {
                        continue;
                    }
                    let score = self.player.score;
                    log::info!("stage cleared with score {score}");
                    self.set_state(
                        PlayState::Paused(PauseReason::StageClear { score }),
                        out_events,
                    );
                    out_events.push(Event::StageCleared { score });
                }
                Deferred::HarvestPrompt => {
                    if self.state.is_playing() {
                        self.prompt_harvest(out_events);
                    }
                }
            }
        }
    }

    fn prompt_harvest(&mut self, out_events: &mut Vec<Event>) {
        if self.pending_harvests == 0 {
            return;
        }
        self.pending_harvests -= 1;
        self.player.steering = false;
        self.set_state(PlayState::Paused(PauseReason::UpgradeChoice), out_events);
        out_events.push(Event::UpgradeDue {
            reason: UpgradeReason::Harvest,
        });
    }

    fn spawn_enemy(&mut self, spawn: EnemySpawn, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        self.enemies.push(Enemy::from_spawn(id, spawn));
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind: spawn.kind,
            position: spawn.position,
        });
    }

    fn swing_hoe(&mut self, start_angle: f32, out_events: &mut Vec<Event>) {
        let level = self.arsenal.level(WeaponKind::Hoe);
        if level == 0 {
            return;
        }
        let profile = WeaponKind::Hoe.profile(level);
        let origin = self.player.position;
        self.hoe_effects
            .push(HoeEffect::new(origin, profile.radius, level, start_angle));

        for enemy in self.enemies.iter_mut().filter(|enemy| !enemy.is_defeated()) {
            if distance(origin, enemy.position) > profile.radius + enemy.radius {
                continue;
            }
            enemy.take_damage(profile.damage);
            if let Some(knockback) = profile.knockback {
                enemy.position += direction_between(origin, enemy.position) * knockback;
            }
        }
        self.reap_defeated(out_events);

        if !self.harvest_mode() {
            return;
        }
        let added = self.field.cultivate_disc(origin, profile.radius);
        if added > 0 {
            out_events.push(Event::TilesCultivated { added });
        }
        let frame = self.frame;
        let mut harvested = 0;
        for wheat in self.wheat.iter_mut().filter(|wheat| wheat.is_harvestable()) {
            if distance(origin, wheat.position) <= profile.radius {
                wheat.harvested_at = Some(frame);
                harvested += 1;
                out_events.push(Event::WheatHarvested {
                    position: wheat.position,
                });
            }
        }
        if harvested > 0 {
            self.pending_harvests = self.pending_harvests.saturating_add(harvested);
            // Prompt on the next tick so the rest of this frame's volley still fires.
            if !self.schedule.contains(Deferred::HarvestPrompt) {
                self.schedule
                    .schedule(self.frame.saturating_add(1), Deferred::HarvestPrompt);
            }
        }
    }

    fn launch_veggie(&mut self, target: Vec2, skin: VeggieSkin) {
        let level = self.arsenal.level(WeaponKind::Veggie);
        if level == 0 {
            return;
        }
        let profile = WeaponKind::Veggie.profile(level);
        let origin = self.player.position;
        self.projectiles.push(Projectile::new(
            ProjectileSkin::Veggie(skin),
            origin,
            direction_between(origin, target) * VEGGIE_SPEED,
            profile.damage,
            profile.radius,
            profile.pierce,
            None,
        ));
    }

    fn throw_shovels(&mut self) {
        let level = self.arsenal.level(WeaponKind::Shovel);
        if level == 0 {
            return;
        }
        let profile = WeaponKind::Shovel.profile(level);
        let middle = (profile.count as f32 - 1.0) / 2.0;
        for index in 0..profile.count {
            let angle = self.player.facing + (index as f32 - middle) * SHOVEL_FAN_STEP;
            self.projectiles.push(Projectile::new(
                ProjectileSkin::Shovel { angle },
                self.player.position,
                unit_from_heading(angle) * SHOVEL_SPEED,
                profile.damage,
                profile.radius,
                profile.pierce,
                None,
            ));
        }
    }

    fn plant_mushrooms(&mut self, sites: &[Vec2]) {
        let level = self.arsenal.level(WeaponKind::Mushroom);
        if level == 0 {
            return;
        }
        let profile = WeaponKind::Mushroom.profile(level);
        for site in sites.iter().take(profile.count as usize) {
            self.explosions
                .push(Explosion::new(*site, profile.radius, profile.damage));
        }
    }

    fn offer_upgrades(
        &mut self,
        choices: &[UpgradeChoice],
        reason: UpgradeReason,
        out_events: &mut Vec<Event>,
    ) {
        if self.state != PlayState::Paused(PauseReason::UpgradeChoice) {
            log::debug!("upgrade offer ignored while {:?}", self.state);
            return;
        }
        let mut offered: Vec<WeaponKind> = Vec::new();
        for choice in choices {
            let UpgradeChoice::Weapon(weapon) = *choice else {
                continue;
            };
            if self.arsenal.level(weapon) < MAX_WEAPON_LEVEL && !offered.contains(&weapon) {
                offered.push(weapon);
            }
            if offered.len() == MAX_OFFERED_UPGRADES {
                break;
            }
        }
        let mut options: Vec<UpgradeOption> = offered
            .into_iter()
            .map(|weapon| UpgradeOption::for_weapon(weapon, self.arsenal.level(weapon)))
            .collect();
        if options.is_empty() {
            options.push(UpgradeOption::sentinel());
        }
        out_events.push(Event::UpgradesOffered { options, reason });
    }

    fn apply_upgrade(&mut self, choice: UpgradeChoice, out_events: &mut Vec<Event>) {
        let raised = match choice {
            UpgradeChoice::Weapon(weapon) => self
                .arsenal
                .raise(weapon)
                .map(|level| Event::WeaponUpgraded { weapon, level }),
            UpgradeChoice::Max => None,
        };
        match raised {
            Some(event) => out_events.push(event),
            None => {
                log::debug!("upgrade {:?} had no effect", choice);
                out_events.push(Event::UpgradeIgnored { choice });
            }
        }
    }

    fn grant_treasure(
        &mut self,
        tier: TreasureTier,
        slots: &[TreasureSlot],
        out_events: &mut Vec<Event>,
    ) {
        let mut outcomes = Vec::with_capacity(slots.len());
        for slot in slots {
            let upgraded = match *slot {
                TreasureSlot::Upgrade(weapon) => self
                    .arsenal
                    .raise(weapon)
                    .map(|level| TreasureOutcome::Upgraded { weapon, level }),
                TreasureSlot::Bonus => None,
            };
            let outcome = upgraded.unwrap_or_else(|| {
                self.player.score = self.player.score.saturating_add(TREASURE_BONUS_SCORE);
                TreasureOutcome::Bonus {
                    score: TREASURE_BONUS_SCORE,
                }
            });
            outcomes.push(outcome);
        }
        out_events.push(Event::TreasureOpened {
            report: TreasureReport { tier, outcomes },
        });
    }

    fn plant_wheat(&mut self, sites: &[Vec2], out_events: &mut Vec<Event>) {
        if !self.harvest_mode() {
            log::debug!("wheat planting ignored outside harvest mode");
            return;
        }
        for site in sites {
            self.wheat.push(Wheat::new(*site));
            out_events.push(Event::WheatPlanted { position: *site });
        }
    }

    fn resume(&mut self, out_events: &mut Vec<Event>) {
        if !self.state.is_resumable() {
            log::debug!("resume ignored while {:?}", self.state);
            return;
        }
        self.set_state(PlayState::Playing, out_events);
        if self.pending_harvests > 0 && !self.schedule.contains(Deferred::HarvestPrompt) {
            self.schedule.schedule(
                self.frame
                    .saturating_add(self.config.harvest_prompt_delay_frames),
                Deferred::HarvestPrompt,
            );
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let playing = world.state.is_playing();
    match command {
        Command::Tick { keys } => {
            if playing {
                world.advance_frame(keys, out_events);
            }
        }
        Command::SetPointerTarget { target } => {
            if playing {
                world.player.target = target;
                world.player.steering = true;
            }
        }
        Command::ReleasePointer => world.player.steering = false,
        Command::SpawnEnemy { spawn } => {
            if !world.state.is_terminal() {
                world.spawn_enemy(spawn, out_events);
            }
        }
        Command::BeginBossEncounter { spawn } => {
            if !world.state.is_terminal() {
                let before = world.enemies.len();
                world.enemies.retain(|enemy| enemy.kind.drops_treasure());
                let removed = before - world.enemies.len();
                log::info!("boss encounter begins, {removed} enemies cleared");
                out_events.push(Event::CommonEnemiesCleared { removed });
                world.spawn_enemy(spawn, out_events);
            }
        }
        Command::SwingHoe { start_angle } => {
            if playing {
                world.swing_hoe(start_angle, out_events);
            }
        }
        Command::LaunchVeggie { target, skin } => {
            if playing {
                world.launch_veggie(target, skin);
            }
        }
        Command::ThrowShovels => {
            if playing {
                world.throw_shovels();
            }
        }
        Command::PlantMushrooms { sites } => {
            if playing {
                world.plant_mushrooms(&sites);
            }
        }
        Command::OfferUpgrades { choices, reason } => {
            world.offer_upgrades(&choices, reason, out_events);
        }
        Command::ApplyUpgrade { choice } => {
            if world.state != PlayState::TornDown {
                world.apply_upgrade(choice, out_events);
            }
        }
        Command::GrantTreasure { tier, slots } => {
            if world.state != PlayState::TornDown {
                world.grant_treasure(tier, &slots, out_events);
            }
        }
        Command::PlantWheat { sites } => {
            if !world.state.is_terminal() {
                world.plant_wheat(&sites, out_events);
            }
        }
        Command::Pause => {
            if playing {
                world.set_state(PlayState::Paused(PauseReason::External), out_events);
            }
        }
        Command::Resume => world.resume(out_events),
        Command::Teardown => {
            if world.state != PlayState::TornDown {
                world.schedule.clear();
                world.set_state(PlayState::TornDown, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use scarecrow_core::{
        CultivationView, EnemySnapshot, EnemyView, Loadout, PlayState, PlayerSnapshot,
        ProgressionMode, WheatSnapshot,
    };

    use super::{ProjectileSkin, World};

    /// Current play state.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.state
    }

    /// Progression mode the world was created with.
    #[must_use]
    pub fn mode(world: &World) -> ProgressionMode {
        world.config.mode
    }

    /// Number of frames simulated so far.
    #[must_use]
    pub fn frame(world: &World) -> u64 {
        world.frame
    }

    /// Whole in-game seconds elapsed.
    #[must_use]
    pub fn elapsed_seconds(world: &World) -> u32 {
        world.elapsed_seconds
    }

    /// Snapshot of the player.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        let player = &world.player;
        PlayerSnapshot {
            position: player.position,
            radius: player.radius,
            facing: player.facing,
            hp: player.hp,
            max_hp: player.max_hp,
            exp: player.exp,
            max_exp: player.max_exp,
            level: player.level,
            score: player.score,
            steering: player.steering,
            loadout: world.arsenal.loadout(),
        }
    }

    /// Current weapon levels.
    #[must_use]
    pub fn loadout(world: &World) -> Loadout {
        world.arsenal.loadout()
    }

    /// Captures a read-only view of the enemies on the field.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|enemy| EnemySnapshot {
                    id: enemy.id,
                    kind: enemy.kind,
                    position: enemy.position,
                    radius: enemy.radius,
                    hp: enemy.hp,
                    max_hp: enemy.max_hp,
                    wobble: enemy.wobble,
                    facing: enemy.facing,
                })
                .collect(),
        )
    }

    /// Experience gems waiting to be collected.
    #[must_use]
    pub fn gems(world: &World) -> Vec<GemSnapshot> {
        world
            .gems
            .iter()
            .map(|gem| GemSnapshot {
                position: gem.position,
                radius: gem.radius,
                value: gem.value,
            })
            .collect()
    }

    /// Treasure boxes waiting to be collected.
    #[must_use]
    pub fn treasure_boxes(world: &World) -> Vec<TreasureBoxSnapshot> {
        world
            .treasure_boxes
            .iter()
            .map(|chest| TreasureBoxSnapshot {
                position: chest.position,
                radius: chest.radius,
                wobble: chest.wobble,
            })
            .collect()
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                skin: projectile.skin,
                position: projectile.position,
                velocity: projectile.velocity,
                radius: projectile.radius,
                pierce: projectile.pierce,
                hits: projectile.hit.len(),
            })
            .collect()
    }

    /// Mushroom blasts that have not yet faded.
    #[must_use]
    pub fn explosions(world: &World) -> Vec<ExplosionSnapshot> {
        world
            .explosions
            .iter()
            .map(|explosion| ExplosionSnapshot {
                position: explosion.position,
                radius: explosion.radius,
                progress: explosion.progress(),
                hits: explosion.hit.len(),
            })
            .collect()
    }

    /// Hoe sweeps still being drawn.
    #[must_use]
    pub fn hoe_effects(world: &World) -> Vec<HoeEffectSnapshot> {
        world
            .hoe_effects
            .iter()
            .map(|effect| HoeEffectSnapshot {
                origin: effect.origin,
                radius: effect.radius,
                level: effect.level,
                angle: effect.current_angle(),
            })
            .collect()
    }

    /// Wheat growing on the field, including recently harvested stalks.
    #[must_use]
    pub fn wheat(world: &World) -> Vec<WheatSnapshot> {
        world
            .wheat
            .iter()
            .map(|wheat| WheatSnapshot {
                position: wheat.position,
                age: wheat.age,
                mature: wheat.is_mature(),
                harvested: wheat.harvested_at.is_some(),
            })
            .collect()
    }

    /// Number of mature stalks that a hoe sweep could harvest right now.
    #[must_use]
    pub fn harvestable_wheat(world: &World) -> usize {
        world
            .wheat
            .iter()
            .filter(|wheat| wheat.is_harvestable())
            .count()
    }

    /// Harvests still waiting for their upgrade prompt.
    #[must_use]
    pub fn pending_harvests(world: &World) -> u32 {
        world.pending_harvests
    }

    /// Exposes a read-only view of the cultivated tiles.
    #[must_use]
    pub fn cultivation(world: &World) -> CultivationView<'_> {
        CultivationView::new(world.field.tiles())
    }

    /// Whether a body of `radius` at `position` stands on cultivated ground.
    #[must_use]
    pub fn is_supported(world: &World, position: Vec2, radius: f32) -> bool {
        world.field.supports(position, radius)
    }

    /// Read-only description of an experience gem.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct GemSnapshot {
        /// World position.
        pub position: Vec2,
        /// Pickup radius.
        pub radius: f32,
        /// Experience granted.
        pub value: u32,
    }

    /// Read-only description of a treasure box.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct TreasureBoxSnapshot {
        /// World position.
        pub position: Vec2,
        /// Pickup radius.
        pub radius: f32,
        /// Idle animation phase.
        pub wobble: f32,
    }

    /// Read-only description of a projectile in flight.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ProjectileSnapshot {
        /// Cosmetic identity.
        pub skin: ProjectileSkin,
        /// World position.
        pub position: Vec2,
        /// Displacement per frame.
        pub velocity: Vec2,
        /// Collision radius.
        pub radius: f32,
        /// Remaining pierce.
        pub pierce: u32,
        /// Number of distinct enemies struck so far.
        pub hits: usize,
    }

    /// Read-only description of a mushroom blast.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct ExplosionSnapshot {
        /// Blast centre.
        pub position: Vec2,
        /// Blast radius.
        pub radius: f32,
        /// Fraction of the blast lifetime already elapsed.
        pub progress: f32,
        /// Number of enemies damaged by the blast.
        pub hits: usize,
    }

    /// Read-only description of a hoe sweep.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct HoeEffectSnapshot {
        /// Player position when the sweep started.
        pub origin: Vec2,
        /// Sweep reach.
        pub radius: f32,
        /// Hoe level at the time of the sweep.
        pub level: u8,
        /// Angle reached by the blade.
        pub angle: f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scarecrow_core::EnemyKind;

    fn worm_at(position: Vec2) -> Command {
        Command::SpawnEnemy {
            spawn: EnemySpawn {
                kind: EnemyKind::Worm,
                position,
                speed: 1.0,
            },
        }
    }

    fn tick(world: &mut World, events: &mut Vec<Event>) {
        apply(
            world,
            Command::Tick {
                keys: MoveKeys::default(),
            },
            events,
        );
    }

    #[test]
    fn hoe_sweep_kills_worm_and_drops_gem_where_it_fell() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, worm_at(Vec2::new(50.0, 0.0)), &mut events);
        apply(&mut world, Command::SwingHoe { start_angle: 0.0 }, &mut events);

        assert!(world.enemies.is_empty());
        let fallen = events.iter().find_map(|event| match event {
            Event::EnemyDefeated { position, .. } => Some(*position),
            _ => None,
        });
        let dropped = events.iter().find_map(|event| match event {
            Event::GemDropped { position } => Some(*position),
            _ => None,
        });
        assert_eq!(fallen, Some(Vec2::new(50.0, 0.0)));
        assert_eq!(dropped, fallen);
        assert_eq!(world.gems.len(), 1);
        assert_eq!(world.hoe_effects.len(), 1);
    }

    #[test]
    fn crossing_experience_threshold_levels_once_and_pauses() {
        let mut world = World::new();
        world.player.exp = 9;
        world.gems.push(ExpGem::new(world.player.position));
        let mut events = Vec::new();
        tick(&mut world, &mut events);

        assert_eq!(world.player.level, 2);
        assert_eq!(world.player.exp, 0);
        assert_eq!(world.player.max_exp, 15);
        assert_eq!(world.player.score, GEM_SCORE);
        assert_eq!(
            world.state,
            PlayState::Paused(PauseReason::UpgradeChoice)
        );
        assert!(events.contains(&Event::UpgradeDue {
            reason: UpgradeReason::LevelUp
        }));
    }

    #[test]
    fn level_up_heal_is_capped() {
        let mut world = World::new();
        world.player.hp = 90.0;
        world.player.exp = 9;
        world.gems.push(ExpGem::new(world.player.position));
        tick(&mut world, &mut Vec::new());
        assert_eq!(world.player.hp, world.player.max_hp);
    }

    #[test]
    fn paused_world_ignores_ticks() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, worm_at(Vec2::new(300.0, 0.0)), &mut events);
        apply(&mut world, Command::Pause, &mut events);
        events.clear();
        tick(&mut world, &mut events);
        apply(&mut world, Command::SwingHoe { start_angle: 0.0 }, &mut events);
        assert!(events.is_empty());
        assert_eq!(world.frame, 0);
        assert_eq!(world.enemies[0].position, Vec2::new(300.0, 0.0));
        assert!(world.hoe_effects.is_empty());
    }

    #[test]
    fn game_over_rejects_spawns() {
        let mut world = World::new();
        world.state = PlayState::GameOver;
        let mut events = Vec::new();
        apply(&mut world, worm_at(Vec2::new(300.0, 0.0)), &mut events);
        assert!(events.is_empty());
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn boss_bounty_is_immediate_and_stage_clears_after_delay() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                spawn: EnemySpawn {
                    kind: EnemyKind::Boss,
                    position: Vec2::new(50.0, 0.0),
                    speed: 1.4,
                },
            },
            &mut events,
        );
        world.enemies[0].hp = 1.0;
        apply(&mut world, Command::SwingHoe { start_angle: 0.0 }, &mut events);
        assert_eq!(world.player.score, BOSS_BOUNTY);
        assert_eq!(world.treasure_boxes.len(), 1);

        // Keep the player away from the boss chest.
        world.treasure_boxes.clear();
        for _ in 0..DEFAULT_STAGE_CLEAR_DELAY_FRAMES - 1 {
            tick(&mut world, &mut events);
        }
        assert!(world.state.is_playing());
        tick(&mut world, &mut events);
        assert_eq!(
            world.state,
            PlayState::Paused(PauseReason::StageClear {
                score: BOSS_BOUNTY
            })
        );

        events.clear();
        apply(&mut world, Command::Resume, &mut events);
        assert!(events.is_empty());
        assert!(world.state.is_terminal());
    }

    #[test]
    fn teardown_cancels_stage_clear() {
        let mut world = World::new();
        world
            .schedule
            .schedule(1, Deferred::StageClear);
        let mut events = Vec::new();
        apply(&mut world, Command::Teardown, &mut events);
        tick(&mut world, &mut events);
        assert_eq!(world.state, PlayState::TornDown);
        assert!(!events.iter().any(|event| matches!(event, Event::StageCleared { .. })));
    }

    #[test]
    fn contact_damage_ends_the_run_at_zero_hp() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, worm_at(Vec2::new(5.0, 0.0)), &mut events);
        world.player.hp = 0.1;
        tick(&mut world, &mut events);
        assert_eq!(world.state, PlayState::GameOver);
        assert_eq!(world.player.hp, 0.0);
        assert!(events.contains(&Event::GameOver));
    }

    #[test]
    fn offers_skip_maxed_weapons_and_fall_back_to_sentinel() {
        let mut world = World::new();
        let mut events = Vec::new();
        world.state = PlayState::Paused(PauseReason::UpgradeChoice);
        for _ in 0..4 {
            let _ = world.arsenal.raise(WeaponKind::Hoe);
        }
        apply(
            &mut world,
            Command::OfferUpgrades {
                choices: vec![
                    UpgradeChoice::Weapon(WeaponKind::Hoe),
                    UpgradeChoice::Weapon(WeaponKind::Shovel),
                ],
                reason: UpgradeReason::LevelUp,
            },
            &mut events,
        );
        let Some(Event::UpgradesOffered { options, .. }) = events.pop() else {
            panic!("expected an offer");
        };
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].choice, UpgradeChoice::Weapon(WeaponKind::Shovel));

        apply(
            &mut world,
            Command::OfferUpgrades {
                choices: vec![UpgradeChoice::Weapon(WeaponKind::Hoe)],
                reason: UpgradeReason::LevelUp,
            },
            &mut events,
        );
        let Some(Event::UpgradesOffered { options, .. }) = events.pop() else {
            panic!("expected an offer");
        };
        assert_eq!(options, vec![UpgradeOption::sentinel()]);
    }

    #[test]
    fn treasure_falls_back_to_bonus_when_weapon_is_maxed() {
        let mut world = World::new();
        let mut events = Vec::new();
        for _ in 0..4 {
            let _ = world.arsenal.raise(WeaponKind::Hoe);
        }
        apply(
            &mut world,
            Command::GrantTreasure {
                tier: TreasureTier::Rare,
                slots: vec![
                    TreasureSlot::Upgrade(WeaponKind::Veggie),
                    TreasureSlot::Upgrade(WeaponKind::Hoe),
                    TreasureSlot::Bonus,
                ],
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::TreasureOpened {
                report: TreasureReport {
                    tier: TreasureTier::Rare,
                    outcomes: vec![
                        TreasureOutcome::Upgraded {
                            weapon: WeaponKind::Veggie,
                            level: 1
                        },
                        TreasureOutcome::Bonus { score: 500 },
                        TreasureOutcome::Bonus { score: 500 },
                    ],
                },
            }]
        );
        assert_eq!(world.player.score, 1000);
    }

    #[test]
    fn projectile_pierces_then_disappears() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, worm_at(Vec2::new(300.0, 0.0)), &mut events);
        apply(&mut world, worm_at(Vec2::new(330.0, 0.0)), &mut events);
        world.projectiles.push(Projectile::new(
            ProjectileSkin::Veggie(VeggieSkin::Radish),
            Vec2::new(310.0, 0.0),
            Vec2::ZERO,
            1.0,
            30.0,
            1,
            None,
        ));
        tick(&mut world, &mut events);
        assert!(world.projectiles.is_empty());
        assert!(world.enemies.iter().all(|enemy| enemy.hp == 9.0));
    }

    #[test]
    fn mushroom_blast_damages_each_enemy_once() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ApplyUpgrade {
                choice: UpgradeChoice::Weapon(WeaponKind::Mushroom),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnEnemy {
                spawn: EnemySpawn {
                    kind: EnemyKind::Elite,
                    position: Vec2::new(400.0, 0.0),
                    speed: 1.6,
                },
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::PlantMushrooms {
                sites: vec![Vec2::new(400.0, 0.0), Vec2::new(405.0, 0.0), Vec2::new(0.0, 900.0)],
            },
            &mut events,
        );
        assert_eq!(world.explosions.len(), 2);

        let mut last_hp = f32::MAX;
        for _ in 0..30 {
            tick(&mut world, &mut events);
            let hp = query::enemy_view(&world)
                .iter()
                .map(|enemy| enemy.hp)
                .next()
                .unwrap_or_default();
            assert!(hp <= last_hp);
            last_hp = hp;
        }
        let damage = WeaponKind::Mushroom.profile(1).damage;
        assert_eq!(last_hp, 120.0 - 2.0 * damage);
        assert!(world.explosions.is_empty());
    }

    #[test]
    fn harvest_movement_never_leaves_the_field() {
        let mut world = World::with_config(WorldConfig {
            mode: ProgressionMode::Harvest,
            ..WorldConfig::default()
        });
        let keys = MoveKeys {
            right: true,
            down: true,
            ..MoveKeys::default()
        };
        for _ in 0..400 {
            apply(&mut world, Command::Tick { keys }, &mut Vec::new());
            assert!(world.field.supports(world.player.position, world.player.radius));
        }
        assert!(world.player.position.x > 0.0);
    }

    #[test]
    fn harvest_level_up_requests_wheat_without_pausing() {
        let mut world = World::with_config(WorldConfig {
            mode: ProgressionMode::Harvest,
            ..WorldConfig::default()
        });
        world.player.exp = 9;
        world.gems.push(ExpGem::new(world.player.position));
        let mut events = Vec::new();
        tick(&mut world, &mut events);
        assert!(world.state.is_playing());
        assert!(events.contains(&Event::WheatDue { count: 3 }));
    }

    #[test]
    fn queued_harvests_prompt_again_after_resume() {
        let mut world = World::with_config(WorldConfig {
            mode: ProgressionMode::Harvest,
            ..WorldConfig::default()
        });
        let mut events = Vec::new();
        let sites = vec![Vec2::new(10.0, 0.0), Vec2::new(-10.0, 0.0)];
        apply(&mut world, Command::PlantWheat { sites }, &mut events);
        for wheat in world.wheat.iter_mut() {
            wheat.age = wheat.maturity;
        }
        apply(&mut world, Command::SwingHoe { start_angle: 0.0 }, &mut events);
        assert_eq!(world.pending_harvests, 2);
        tick(&mut world, &mut events);
        assert_eq!(
            world.state,
            PlayState::Paused(PauseReason::UpgradeChoice)
        );
        assert_eq!(world.pending_harvests, 1);

        apply(&mut world, Command::Resume, &mut events);
        events.clear();
        for _ in 0..DEFAULT_HARVEST_PROMPT_DELAY_FRAMES {
            tick(&mut world, &mut events);
        }
        assert!(events.contains(&Event::UpgradeDue {
            reason: UpgradeReason::Harvest
        }));
        assert_eq!(world.pending_harvests, 0);
    }

    #[test]
    fn harvest_prompt_waits_for_the_rest_of_the_volley() {
        let mut world = World::with_config(WorldConfig {
            mode: ProgressionMode::Harvest,
            ..WorldConfig::default()
        });
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ApplyUpgrade {
                choice: UpgradeChoice::Weapon(WeaponKind::Shovel),
            },
            &mut events,
        );
        let sites = vec![Vec2::new(10.0, 0.0)];
        apply(&mut world, Command::PlantWheat { sites }, &mut events);
        for wheat in world.wheat.iter_mut() {
            wheat.age = wheat.maturity;
        }

        apply(&mut world, Command::SwingHoe { start_angle: 0.0 }, &mut events);
        apply(&mut world, Command::ThrowShovels, &mut events);
        assert!(world.state.is_playing());
        assert_eq!(world.projectiles.len(), 1);
        assert_eq!(world.pending_harvests, 1);

        events.clear();
        tick(&mut world, &mut events);
        assert_eq!(
            world.state,
            PlayState::Paused(PauseReason::UpgradeChoice)
        );
        assert!(events.contains(&Event::UpgradeDue {
            reason: UpgradeReason::Harvest
        }));
        assert_eq!(world.pending_harvests, 0);
    }

    #[test]
    fn boss_encounter_clears_common_enemies() {
        let mut world = World::new();
        let mut events = Vec::new();
        let spawn = |kind, position| Command::SpawnEnemy {
            spawn: EnemySpawn {
                kind,
                position,
                speed: 1.0,
            },
        };
        apply(&mut world, spawn(EnemyKind::Worm, Vec2::new(300.0, 0.0)), &mut events);
        apply(&mut world, spawn(EnemyKind::Crow, Vec2::new(0.0, 300.0)), &mut events);
        apply(&mut world, spawn(EnemyKind::Elite, Vec2::new(-300.0, 0.0)), &mut events);

        events.clear();
        apply(
            &mut world,
            Command::BeginBossEncounter {
                spawn: EnemySpawn {
                    kind: EnemyKind::Boss,
                    position: Vec2::new(0.0, -400.0),
                    speed: 0.8,
                },
            },
            &mut events,
        );
        let kinds: Vec<EnemyKind> = world.enemies.iter().map(|enemy| enemy.kind).collect();
        assert_eq!(kinds, vec![EnemyKind::Elite, EnemyKind::Boss]);
        assert_eq!(events[0], Event::CommonEnemiesCleared { removed: 2 });
        assert!(matches!(
            events[1],
            Event::EnemySpawned {
                kind: EnemyKind::Boss,
                ..
            }
        ));
    }

    #[test]
    fn third_shovel_level_throws_a_pair() {
        let mut world = World::new();
        let mut events = Vec::new();
        for _ in 0..3 {
            apply(
                &mut world,
                Command::ApplyUpgrade {
                    choice: UpgradeChoice::Weapon(WeaponKind::Shovel),
                },
                &mut events,
            );
        }
        apply(&mut world, Command::ThrowShovels, &mut events);

        assert_eq!(world.projectiles.len(), 2);
        let angles: Vec<f32> = world
            .projectiles
            .iter()
            .map(|projectile| match projectile.skin {
                ProjectileSkin::Shovel { angle } => angle,
                ProjectileSkin::Veggie(_) => f32::NAN,
            })
            .collect();
        assert!((angles[0] + 0.1).abs() < 1e-6);
        assert!((angles[1] - 0.1).abs() < 1e-6);
        assert!(world.projectiles.iter().all(|projectile| projectile.pierce == 5));
    }

    #[test]
    fn third_hoe_level_knocks_survivors_back() {
        let mut world = World::new();
        let mut events = Vec::new();
        for _ in 0..2 {
            apply(
                &mut world,
                Command::ApplyUpgrade {
                    choice: UpgradeChoice::Weapon(WeaponKind::Hoe),
                },
                &mut events,
            );
        }
        apply(
            &mut world,
            Command::SpawnEnemy {
                spawn: EnemySpawn {
                    kind: EnemyKind::Elite,
                    position: Vec2::new(50.0, 0.0),
                    speed: 1.6,
                },
            },
            &mut events,
        );
        apply(&mut world, Command::SwingHoe { start_angle: 0.0 }, &mut events);

        let elite = &world.enemies[0];
        assert_eq!(elite.hp, 70.0);
        assert!((elite.position - Vec2::new(90.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn timed_projectile_expires() {
        let mut world = World::new();
        world.projectiles.push(Projectile::new(
            ProjectileSkin::Shovel { angle: 0.0 },
            Vec2::new(200.0, 0.0),
            Vec2::ZERO,
            1.0,
            15.0,
            3,
            Some(3),
        ));
        let mut events = Vec::new();
        tick(&mut world, &mut events);
        tick(&mut world, &mut events);
        assert_eq!(world.projectiles.len(), 1);
        tick(&mut world, &mut events);
        assert!(world.projectiles.is_empty());
    }
}
