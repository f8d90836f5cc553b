//! Tilled ground that the player may walk on in harvest mode.

use std::collections::BTreeSet;

use glam::Vec2;
use scarecrow_core::{distance, FieldTile, TILE_SIZE};

pub(crate) const INITIAL_FIELD_RADIUS_TILES: f32 = 4.0;

const SUPPORT_SAMPLES: [Vec2; 5] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(-1.0, -1.0),
    Vec2::new(1.0, -1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(1.0, 1.0),
];

/// Ordered set of cultivated tiles. The set only ever grows.
#[derive(Clone, Debug, Default)]
pub(crate) struct CultivationGrid {
    tiles: BTreeSet<FieldTile>,
}

impl CultivationGrid {
    /// Grid seeded with a disc of tiles around the provided spawn point.
    pub(crate) fn seeded_around(spawn: Vec2) -> Self {
        let mut grid = Self::default();
        let _ = grid.cultivate_disc(spawn, INITIAL_FIELD_RADIUS_TILES * TILE_SIZE);
        let _ = grid.tiles.insert(FieldTile::containing(spawn));
        grid
    }

    pub(crate) fn tiles(&self) -> &BTreeSet<FieldTile> {
        &self.tiles
    }

    /// Adds every tile whose centre lies within `radius` of `center`.
    ///
    /// Returns how many tiles were newly cultivated.
    pub(crate) fn cultivate_disc(&mut self, center: Vec2, radius: f32) -> usize {
        let reach = (radius / TILE_SIZE).ceil() as i32 + 1;
        let origin = FieldTile::containing(center);
        let mut added = 0;
        for row in origin.row() - reach..=origin.row() + reach {
            for column in origin.column() - reach..=origin.column() + reach {
                let tile = FieldTile::new(column, row);
                if distance(tile.center(), center) <= radius && self.tiles.insert(tile) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Whether a body of `radius` at `position` stands on cultivated ground.
    ///
    /// The centre and the four corners of the bounding square are sampled; a
    /// single cultivated sample is enough.
    pub(crate) fn supports(&self, position: Vec2, radius: f32) -> bool {
        SUPPORT_SAMPLES
            .iter()
            .any(|offset| self.tiles.contains(&FieldTile::containing(position + *offset * radius)))
    }

    /// Resolves a movement attempt against the field.
    ///
    /// Returns the accepted position and whether the requested candidate was
    /// rejected. Rejected moves slide along the y axis, then the x axis, and
    /// otherwise stay put.
    pub(crate) fn resolve_move(&self, from: Vec2, candidate: Vec2, radius: f32) -> (Vec2, bool) {
        if self.supports(candidate, radius) {
            return (candidate, false);
        }
        let vertical = Vec2::new(from.x, candidate.y);
        if self.supports(vertical, radius) {
            return (vertical, true);
        }
        let horizontal = Vec2::new(candidate.x, from.y);
        if self.supports(horizontal, radius) {
            return (horizontal, true);
        }
        (from, true)
    }
}
