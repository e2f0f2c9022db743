//! Positions and the garden rectangle.
//!
//! All coordinates are real-valued pixels inside a fixed rectangle. Every
//! position that reaches the store must already be clamped to the rectangle;
//! [`GardenBounds::clamp`] is the single place that enforcement happens.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Default garden width in pixels.
pub const DEFAULT_GARDEN_WIDTH: f64 = 800.0;

/// Default garden height in pixels.
pub const DEFAULT_GARDEN_HEIGHT: f64 = 600.0;

/// A 2-D point in garden coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate, 0 at the left edge.
    pub x: f64,
    /// Vertical coordinate, 0 at the top edge.
    pub y: f64,
}

impl Position {
    /// Construct a position from raw coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }

    /// Step up to `max_step` pixels toward `target`.
    ///
    /// Returns the new position and the distance actually covered. Lands
    /// exactly on the target when it is closer than the step length; a
    /// zero-length step (already there) covers 0.
    pub fn step_toward(self, target: Self, max_step: f64) -> (Self, f64) {
        let dist = self.distance_to(target);
        if dist <= f64::EPSILON || max_step <= 0.0 {
            return (self, 0.0);
        }
        if dist <= max_step {
            return (target, dist);
        }
        let scale = max_step / dist;
        let next = Self {
            x: self.x + (target.x - self.x) * scale,
            y: self.y + (target.y - self.y) * scale,
        };
        (next, max_step)
    }
}

/// The fixed world rectangle containing all entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GardenBounds {
    /// Rectangle width in pixels.
    pub width: f64,
    /// Rectangle height in pixels.
    pub height: f64,
}

impl GardenBounds {
    /// Construct bounds from explicit dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Clamp a position into the rectangle.
    pub fn clamp(self, position: Position) -> Position {
        Position {
            x: position.x.clamp(0.0, self.width),
            y: position.y.clamp(0.0, self.height),
        }
    }

    /// Whether a position lies inside the rectangle (edges inclusive).
    pub fn contains(self, position: Position) -> bool {
        position.x >= 0.0
            && position.x <= self.width
            && position.y >= 0.0
            && position.y <= self.height
    }

    /// The center of the rectangle.
    pub fn center(self) -> Position {
        Position::new(self.width / 2.0, self.height / 2.0)
    }

    /// Distance from a position to the nearest edge of the rectangle.
    pub fn distance_to_edge(self, position: Position) -> f64 {
        let left = position.x;
        let right = self.width - position.x;
        let top = position.y;
        let bottom = self.height - position.y;
        left.min(right).min(top).min(bottom)
    }
}

impl Default for GardenBounds {
    fn default() -> Self {
        Self::new(DEFAULT_GARDEN_WIDTH, DEFAULT_GARDEN_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance_to(b) - 5.0).abs() < 1e-12);
        assert!((b.distance_to(a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn step_toward_caps_at_target() {
        let a = Position::new(10.0, 10.0);
        let b = Position::new(13.0, 10.0);
        let (next, covered) = a.step_toward(b, 50.0);
        assert_eq!(next, b);
        assert!((covered - 3.0).abs() < 1e-12);
    }

    #[test]
    fn step_toward_moves_partially() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(10.0, 0.0);
        let (next, covered) = a.step_toward(b, 4.0);
        assert!((next.x - 4.0).abs() < 1e-12);
        assert!((covered - 4.0).abs() < 1e-12);
    }

    #[test]
    fn step_toward_zero_distance_is_noop() {
        let a = Position::new(5.0, 5.0);
        let (next, covered) = a.step_toward(a, 4.0);
        assert_eq!(next, a);
        assert!(covered.abs() < 1e-12);
    }

    #[test]
    fn clamp_keeps_positions_inside() {
        let bounds = GardenBounds::default();
        let clamped = bounds.clamp(Position::new(-5.0, 700.0));
        assert_eq!(clamped, Position::new(0.0, 600.0));
        assert!(bounds.contains(clamped));
    }

    #[test]
    fn distance_to_edge_picks_nearest_side() {
        let bounds = GardenBounds::default();
        assert!((bounds.distance_to_edge(Position::new(10.0, 300.0)) - 10.0).abs() < 1e-12);
        assert!((bounds.distance_to_edge(Position::new(400.0, 590.0)) - 10.0).abs() < 1e-12);
    }
}
