//! Immovable obstacle shapes.

use crate::float::Float;
use crate::particle::RADIUS;
use crate::vec::Vec2;

/// Discriminant of an [`Obstacle`], for renderers and diagnostics.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    Box,
    InverseBox,
    Circle,
}

/// A static collider. Immutable once built.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Obstacle<F: Float> {
    /// Keeps particle centres out of the rectangle.
    Box { center: Vec2<F>, half_extent: Vec2<F> },
    /// Keeps particle centres inside the rectangle; used for the world boundary.
    InverseBox { center: Vec2<F>, half_extent: Vec2<F> },
    /// Disc of `radius`; overlap is measured against the particle rim.
    Circle { center: Vec2<F>, radius: F },
}

fn center_extent<F: Float>(x0: F, y0: F, x1: F, y1: F) -> (Vec2<F>, Vec2<F>) {
    let lo = Vec2::new(x0.min(x1), y0.min(y1));
    let hi = Vec2::new(x0.max(x1), y0.max(y1));
    let half_extent = (hi - lo).scale(F::half());
    (lo + half_extent, half_extent)
}

impl<F: Float> Obstacle<F> {
    /// Solid box from two opposite corners.
    pub fn boxed(x0: F, y0: F, x1: F, y1: F) -> Self {
        let (center, half_extent) = center_extent(x0, y0, x1, y1);
        Obstacle::Box { center, half_extent }
    }

    /// Containing box from two opposite corners.
    pub fn inverse_box(x0: F, y0: F, x1: F, y1: F) -> Self {
        let (center, half_extent) = center_extent(x0, y0, x1, y1);
        Obstacle::InverseBox { center, half_extent }
    }

    /// Boundary of a `[0, width] x [0, height]` world.
    pub fn world_bounds(width: F, height: F) -> Self {
        Self::inverse_box(F::zero(), F::zero(), width, height)
    }

    pub fn circle(center: Vec2<F>, radius: F) -> Self {
        Obstacle::Circle { center, radius }
    }

    pub fn kind(&self) -> ObstacleKind {
        match self {
            Obstacle::Box { .. } => ObstacleKind::Box,
            Obstacle::InverseBox { .. } => ObstacleKind::InverseBox,
            Obstacle::Circle { .. } => ObstacleKind::Circle,
        }
    }

    /// Axis-aligned bounds of the shape (the bounding square for circles).
    pub fn min_max(&self) -> (Vec2<F>, Vec2<F>) {
        match *self {
            Obstacle::Box { center, half_extent }
            | Obstacle::InverseBox { center, half_extent } => {
                (center - half_extent, center + half_extent)
            }
            Obstacle::Circle { center, radius } => {
                let r = Vec2::splat(radius);
                (center - r, center + r)
            }
        }
    }

    /// Whether a particle centred at `pos` currently penetrates the shape.
    pub fn intersects(&self, pos: Vec2<F>) -> bool {
        match *self {
            Obstacle::Box { .. } => {
                let (min, max) = self.min_max();
                pos.x > min.x && pos.x < max.x && pos.y > min.y && pos.y < max.y
            }
            Obstacle::InverseBox { .. } => {
                let (min, max) = self.min_max();
                pos.x < min.x || pos.x > max.x || pos.y < min.y || pos.y > max.y
            }
            Obstacle::Circle { center, radius } => {
                let reach = radius + F::from_f32(RADIUS);
                center.distance_sq(pos) < reach * reach
            }
        }
    }

    /// Conservative broad-phase test: could a particle centred within
    /// `margin` of `point` (per axis) need resolving against this shape?
    pub fn could_touch(&self, point: Vec2<F>, margin: F) -> bool {
        match *self {
            Obstacle::Box { .. } => {
                let (min, max) = self.min_max();
                point.x >= min.x - margin
                    && point.x <= max.x + margin
                    && point.y >= min.y - margin
                    && point.y <= max.y + margin
            }
            Obstacle::InverseBox { .. } => {
                let (min, max) = self.min_max();
                point.x <= min.x + margin
                    || point.x >= max.x - margin
                    || point.y <= min.y + margin
                    || point.y >= max.y - margin
            }
            Obstacle::Circle { center, radius } => {
                // Per-axis margin; the diagonal reach is margin * sqrt(2).
                let reach = radius + F::from_f32(RADIUS) + margin * F::two();
                center.distance_sq(point) <= reach * reach
            }
        }
    }
}
