//! Closed 2D shapes used for body extents and sensing fields

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A closed region of the plane
///
/// Boundaries are inclusive: two shapes that merely touch overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { center: Vec2, radius: f32 },
    Rect { min: Vec2, max: Vec2 },
}

impl Shape {
    pub fn circle(center: Vec2, radius: f32) -> Self {
        Shape::Circle {
            center,
            radius: radius.abs(),
        }
    }

    /// Axis-aligned rectangle centered on `center`
    pub fn rect(center: Vec2, width: f32, height: f32) -> Self {
        let half = Vec2::new(width.abs(), height.abs()) * 0.5;
        Shape::Rect {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec2 {
        match *self {
            Shape::Circle { center, .. } => center,
            Shape::Rect { min, max } => (min + max) * 0.5,
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Shape::Circle { center, .. } => *center += delta,
            Shape::Rect { min, max } => {
                *min += delta;
                *max += delta;
            }
        }
    }

    /// Copy of this shape moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        let mut moved = *self;
        moved.translate(delta);
        moved
    }

    /// Bounding box as (min, max)
    pub fn aabb(&self) -> (Vec2, Vec2) {
        match *self {
            Shape::Circle { center, radius } => {
                (center - Vec2::splat(radius), center + Vec2::splat(radius))
            }
            Shape::Rect { min, max } => (min, max),
        }
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        match *self {
            Shape::Circle { center, radius } => center.distance_squared(point) <= radius * radius,
            Shape::Rect { min, max } => {
                point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
            }
        }
    }

    /// True when the two shapes share at least one point
    pub fn overlaps(&self, other: &Shape) -> bool {
        match (*self, *other) {
            (Shape::Circle { center: a, radius: ra }, Shape::Circle { center: b, radius: rb }) => {
                let reach = ra + rb;
                a.distance_squared(b) <= reach * reach
            }
            (Shape::Rect { min: a0, max: a1 }, Shape::Rect { min: b0, max: b1 }) => {
                a0.x <= b1.x && b0.x <= a1.x && a0.y <= b1.y && b0.y <= a1.y
            }
            (Shape::Circle { center, radius }, Shape::Rect { min, max })
            | (Shape::Rect { min, max }, Shape::Circle { center, radius }) => {
                let nearest = center.clamp(min, max);
                nearest.distance_squared(center) <= radius * radius
            }
        }
    }
}
