//! Plane geometry helpers shared by the world and systems.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Side length of a cultivation tile in world units.
pub const TILE_SIZE: f32 = 50.0;

/// Euclidean distance between two points.
#[must_use]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Unit vector pointing from `from` towards `to`.
///
/// Coincident points yield the zero vector so callers never feed NaN into
/// position updates.
#[must_use]
pub fn direction_between(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

/// Heading of a vector in radians, measured from the positive x axis.
#[must_use]
pub fn heading(vector: Vec2) -> f32 {
    vector.y.atan2(vector.x)
}

/// Unit vector for the provided heading.
#[must_use]
pub fn unit_from_heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Discrete cultivation cell addressed by signed column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldTile {
    column: i32,
    row: i32,
}

impl FieldTile {
    /// Creates a tile from explicit indices.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Tile that contains the provided world position.
    #[must_use]
    pub fn containing(position: Vec2) -> Self {
        Self {
            column: (position.x / TILE_SIZE).floor() as i32,
            row: (position.y / TILE_SIZE).floor() as i32,
        }
    }

    /// Column index.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Row index.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// World-space centre of the tile.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * TILE_SIZE,
            (self.row as f32 + 0.5) * TILE_SIZE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_have_no_direction() {
        let point = Vec2::new(3.0, -4.0);
        assert_eq!(direction_between(point, point), Vec2::ZERO);
    }

    #[test]
    fn direction_is_normalised() {
        let direction = direction_between(Vec2::ZERO, Vec2::new(3.0, 4.0));
        assert!((direction.length() - 1.0).abs() < 1e-6);
        assert!((distance(Vec2::ZERO, Vec2::new(3.0, 4.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn tiles_floor_negative_coordinates() {
        assert_eq!(FieldTile::containing(Vec2::new(-1.0, 49.9)), FieldTile::new(-1, 0));
        assert_eq!(FieldTile::containing(Vec2::new(50.0, -50.0)), FieldTile::new(1, -1));
        assert_eq!(FieldTile::new(0, 0).center(), Vec2::new(25.0, 25.0));
    }
}
