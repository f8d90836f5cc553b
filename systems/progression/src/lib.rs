#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that rolls upgrade offers, treasure contents and wheat sites.
//!
//! The world announces what is due (`UpgradeDue`, `TreasureCollected`,
//! `WheatDue`) and this system answers with the randomised decisions as
//! commands. All randomness comes from one seeded stream so replays match.

use glam::Vec2;
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use scarecrow_core::{
    distance, Command, CultivationView, Event, FieldTile, Loadout, TreasureSlot, TreasureTier,
    UpgradeChoice, WheatSnapshot,
};

/// Most upgrade choices offered per prompt.
pub const OFFERED_UPGRADES: usize = 3;

/// Minimum distance between two wheat stalks.
pub const WHEAT_SPACING: f32 = 60.0;

const PLACEMENT_ATTEMPTS_PER_STALK: u32 = 20;

/// Configuration parameters required to construct the progression system.
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

/// Read-only inputs the progression system consults while reacting.
#[derive(Clone, Copy, Debug)]
pub struct ProgressionViews<'a> {
    /// Current weapon levels.
    pub loadout: Loadout,
    /// Cultivated ground available for planting.
    pub cultivation: CultivationView<'a>,
    /// Wheat already on the field.
    pub wheat: &'a [WheatSnapshot],
}

/// Progression system that owns the random stream for rewards.
#[derive(Debug)]
pub struct Progression {
    rng: ChaCha8Rng,
}

impl Progression {
    /// Creates a new progression system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes events and immutable views to emit reward commands.
    pub fn handle(&mut self, events: &[Event], views: ProgressionViews<'_>, out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::UpgradeDue { reason } => {
                    let choices = offer_choices(views.loadout, &mut self.rng);
                    log::debug!("offering {choices:?} after {reason:?}");
                    out.push(Command::OfferUpgrades {
                        choices,
                        reason: *reason,
                    });
                }
                Event::TreasureCollected => {
                    let roll = self.rng.gen::<f32>();
                    let (tier, slots) = plan_treasure(roll, views.loadout, &mut self.rng);
                    log::debug!("treasure roll {roll:.3} gives {tier:?}");
                    out.push(Command::GrantTreasure { tier, slots });
                }
                Event::WheatDue { count } => {
                    let sites = choose_wheat_sites(
                        *count,
                        views.cultivation,
                        views.wheat,
                        &mut self.rng,
                    );
                    if !sites.is_empty() {
                        out.push(Command::PlantWheat { sites });
                    }
                }
                _ => {}
            }
        }
    }
}

/// Picks up to [`OFFERED_UPGRADES`] distinct upgradeable weapons at random.
///
/// Falls back to the [`UpgradeChoice::Max`] sentinel once every weapon is maxed.
pub fn offer_choices<R: Rng + ?Sized>(loadout: Loadout, rng: &mut R) -> Vec<UpgradeChoice> {
    let mut eligible = loadout.upgradeable();
    if eligible.is_empty() {
        return vec![UpgradeChoice::Max];
    }
    eligible.shuffle(rng);
    eligible
        .into_iter()
        .take(OFFERED_UPGRADES)
        .map(UpgradeChoice::Weapon)
        .collect()
}

/// Resolves the contents of a treasure box from a uniform `roll` in `[0, 1)`.
///
/// Slots are simulated in order on a copy of the loadout so one box never
/// raises a weapon past the maximum level; a slot with nothing left to
/// upgrade becomes a score bonus.
pub fn plan_treasure<R: Rng + ?Sized>(
    roll: f32,
    loadout: Loadout,
    rng: &mut R,
) -> (TreasureTier, Vec<TreasureSlot>) {
    let tier = TreasureTier::from_roll(roll);
    let mut working = loadout;
    let slots = (0..tier.slots())
        .map(|_| {
            let eligible = working.upgradeable();
            match eligible.choose(rng) {
                Some(weapon) => {
                    let _ = working.raise(*weapon);
                    TreasureSlot::Upgrade(*weapon)
                }
                None => TreasureSlot::Bonus,
            }
        })
        .collect();
    (tier, slots)
}

/// Chooses up to `count` planting sites on free cultivated tiles.
///
/// Sites are tile centres that hold no wheat and keep [`WHEAT_SPACING`] from
/// every other stalk. Placement gives up after a bounded number of attempts,
/// so crowded fields may receive fewer stalks.
pub fn choose_wheat_sites<R: Rng + ?Sized>(
    count: u32,
    cultivation: CultivationView<'_>,
    wheat: &[WheatSnapshot],
    rng: &mut R,
) -> Vec<Vec2> {
    if cultivation.is_empty() {
        log::debug!("no cultivated ground to plant {count} wheat on");
        return Vec::new();
    }
    let tiles: Vec<FieldTile> = cultivation.iter().collect();
    let mut occupied: Vec<Vec2> = wheat.iter().map(|stalk| stalk.position).collect();
    let mut sites = Vec::new();

    for _ in 0..count.saturating_mul(PLACEMENT_ATTEMPTS_PER_STALK) {
        if sites.len() as u32 == count {
            break;
        }
        let Some(tile) = tiles.choose(rng) else {
            break;
        };
        let site = tile.center();
        let crowded = occupied.iter().any(|other| {
            FieldTile::containing(*other) == *tile || distance(*other, site) < WHEAT_SPACING
        });
        if crowded {
            continue;
        }
        occupied.push(site);
        sites.push(site);
    }
    sites
}
