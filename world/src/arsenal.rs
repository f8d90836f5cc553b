//! Weapon levels and cooldown charge, stored side by side per weapon.

use scarecrow_core::{Event, Loadout, WeaponKind};

#[derive(Clone, Debug, Default)]
pub(crate) struct Arsenal {
    loadout: Loadout,
    charge: [u32; 4],
}

impl Arsenal {
    pub(crate) fn loadout(&self) -> Loadout {
        self.loadout
    }

    pub(crate) fn level(&self, weapon: WeaponKind) -> u8 {
        self.loadout.level(weapon)
    }

    /// Raises the weapon one level. Cooldown progress is kept.
    pub(crate) fn raise(&mut self, weapon: WeaponKind) -> Option<u8> {
        self.loadout.raise(weapon)
    }

    /// Accumulates one frame of cooldown for every owned weapon.
    ///
    /// The veggie only charges while enemies are on the field.
    pub(crate) fn charge(&mut self, enemies_present: bool, out_events: &mut Vec<Event>) {
        for weapon in WeaponKind::ALL {
            let level = self.loadout.level(weapon);
            if level == 0 || (weapon == WeaponKind::Veggie && !enemies_present) {
                continue;
            }
            let slot = &mut self.charge[weapon.index()];
            *slot = slot.saturating_add(1);
            if *slot >= weapon.profile(level).cooldown_frames {
                *slot = 0;
                out_events.push(Event::WeaponReady { weapon, level });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_weapons(events: &[Event]) -> Vec<WeaponKind> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::WeaponReady { weapon, .. } => Some(*weapon),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn starter_hoe_fires_after_cooldown() {
        let mut arsenal = Arsenal::default();
        let mut events = Vec::new();
        for _ in 0..79 {
            arsenal.charge(false, &mut events);
        }
        assert!(events.is_empty());
        arsenal.charge(false, &mut events);
        assert_eq!(ready_weapons(&events), vec![WeaponKind::Hoe]);
    }

    #[test]
    fn veggie_waits_for_enemies() {
        let mut arsenal = Arsenal::default();
        let _ = arsenal.raise(WeaponKind::Veggie);
        let mut events = Vec::new();
        for _ in 0..200 {
            arsenal.charge(false, &mut events);
        }
        assert!(!ready_weapons(&events).contains(&WeaponKind::Veggie));

        events.clear();
        for _ in 0..52 {
            arsenal.charge(true, &mut events);
        }
        assert!(ready_weapons(&events).contains(&WeaponKind::Veggie));
    }
}
