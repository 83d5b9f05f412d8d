//! Axis-aligned geometry shared by regions and the splitting line
//!
//! Screen convention: `left < right`, `top < bottom` (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Growth direction of a splitting line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Grows along x, fixed y
    Horizontal,
    /// Grows along y, fixed x
    Vertical,
}

impl Direction {
    /// Coordinate of `point` along the growth axis
    #[inline]
    pub fn parallel(self, point: Vec2) -> f32 {
        match self {
            Direction::Horizontal => point.x,
            Direction::Vertical => point.y,
        }
    }

    /// Coordinate of `point` on the axis orthogonal to growth
    #[inline]
    pub fn perpendicular(self, point: Vec2) -> f32 {
        match self {
            Direction::Horizontal => point.y,
            Direction::Vertical => point.x,
        }
    }

    /// Build a point from (parallel, perpendicular) coordinates
    #[inline]
    pub fn point(self, parallel: f32, perpendicular: f32) -> Vec2 {
        match self {
            Direction::Horizontal => Vec2::new(parallel, perpendicular),
            Direction::Vertical => Vec2::new(perpendicular, parallel),
        }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Has positive extent on both axes and only finite edges
    pub fn is_valid(&self) -> bool {
        [self.left, self.top, self.right, self.bottom]
            .iter()
            .all(|v| v.is_finite())
            && self.left < self.right
            && self.top < self.bottom
    }

    /// Closed containment test (edges count as inside)
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// Open containment test (edges count as outside)
    #[inline]
    pub fn contains_interior(&self, point: Vec2) -> bool {
        point.x > self.left && point.x < self.right && point.y > self.top && point.y < self.bottom
    }

    /// `other` lies entirely within `self`, allowing `tolerance` slack
    pub fn encloses(&self, other: &Rect, tolerance: f32) -> bool {
        other.left >= self.left - tolerance
            && other.right <= self.right + tolerance
            && other.top >= self.top - tolerance
            && other.bottom <= self.bottom + tolerance
    }

    /// Interiors intersect (shared edges do not count)
    pub fn overlaps(&self, other: &Rect, tolerance: f32) -> bool {
        self.left < other.right - tolerance
            && other.left < self.right - tolerance
            && self.top < other.bottom - tolerance
            && other.top < self.bottom - tolerance
    }

    /// Extent along the growth axis of `direction`: (min, max)
    pub fn span(&self, direction: Direction) -> (f32, f32) {
        match direction {
            Direction::Horizontal => (self.left, self.right),
            Direction::Vertical => (self.top, self.bottom),
        }
    }

    /// Cut at `offset` along the axis orthogonal to `direction`.
    ///
    /// Horizontal cuts yield (top, bottom); vertical cuts yield (left, right).
    pub fn cut(&self, direction: Direction, offset: f32) -> (Rect, Rect) {
        match direction {
            Direction::Horizontal => (
                Rect::new(self.left, self.top, self.right, offset),
                Rect::new(self.left, offset, self.right, self.bottom),
            ),
            Direction::Vertical => (
                Rect::new(self.left, self.top, offset, self.bottom),
                Rect::new(offset, self.top, self.right, self.bottom),
            ),
        }
    }
}
