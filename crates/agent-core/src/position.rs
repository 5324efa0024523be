use std::fmt;

use serde::{Deserialize, Serialize};

/// Continuous world position.
///
/// Movement advances agents along straight-line direction vectors, so
/// positions are plain `f64` coordinates rather than tiles. The handful of
/// vector helpers here are everything the movement and formation code needs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: Position) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    /// Unit vector pointing from `self` toward `other` as component offsets.
    ///
    /// Returns `None` when the two positions coincide (no direction exists).
    pub fn direction_to(&self, other: Position) -> Option<(f64, f64, f64)> {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        let length = (dx * dx + dy * dy + dz * dz).sqrt();
        if length <= f64::EPSILON {
            return None;
        }
        Some((dx / length, dy / length, dz / length))
    }

    /// Position offset by the given components.
    pub fn offset(&self, dx: f64, dy: f64, dz: f64) -> Position {
        Position::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Position advanced `step` units along the straight line toward `target`.
    ///
    /// Never overshoots: if `target` is closer than `step`, returns `target`.
    pub fn step_toward(&self, target: Position, step: f64) -> Position {
        if self.distance(target) <= step {
            return target;
        }
        match self.direction_to(target) {
            Some((dx, dy, dz)) => self.offset(dx * step, dy * step, dz * step),
            None => *self,
        }
    }

    /// Centroid of a set of positions; `None` when the set is empty.
    pub fn centroid(points: &[Position]) -> Option<Position> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let (sx, sy, sz) = points.iter().fold((0.0, 0.0, 0.0), |(x, y, z), p| {
            (x + p.x, y + p.y, z + p.z)
        });
        Some(Position::new(sx / n, sy / n, sz / n))
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0, 0.0);
        let b = Position::new(3.0, 4.0, 0.0);
        assert!((a.distance(b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn direction_is_unit_length() {
        let a = Position::new(1.0, 1.0, 0.0);
        let b = Position::new(4.0, 5.0, 0.0);
        let (dx, dy, dz) = a.direction_to(b).unwrap();
        let len = (dx * dx + dy * dy + dz * dz).sqrt();
        assert!((len - 1.0).abs() < 1e-9);
    }

    #[test]
    fn direction_between_coincident_points_is_none() {
        let a = Position::new(2.0, 2.0, 2.0);
        assert!(a.direction_to(a).is_none());
    }

    #[test]
    fn step_toward_never_overshoots() {
        let a = Position::ORIGIN;
        let b = Position::new(1.0, 0.0, 0.0);
        let stepped = a.step_toward(b, 5.0);
        assert_eq!(stepped, b);
    }

    #[test]
    fn centroid_of_square() {
        let points = [
            Position::new(0.0, 0.0, 0.0),
            Position::new(2.0, 0.0, 0.0),
            Position::new(2.0, 2.0, 0.0),
            Position::new(0.0, 2.0, 0.0),
        ];
        let center = Position::centroid(&points).unwrap();
        assert!((center.x - 1.0).abs() < 1e-9);
        assert!((center.y - 1.0).abs() < 1e-9);
    }
}
