//! The splitting line: a segment that grows in both directions from an
//! anchor until it spans the region it is carving.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::collision::{CollisionResult, ball_line_collision};
use super::geometry::{Direction, Rect};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplittingLine {
    direction: Direction,
    /// y for horizontal lines, x for vertical lines
    perp_offset: f32,
    start: f32,
    end: f32,
    /// Bounds of the owning region along the growth axis
    min: f32,
    max: f32,
    /// Growth speed of each end, units per second
    speed: f32,
    /// Region being carved
    region_id: u32,
    /// Timestamp of the last advance (seconds)
    last_update: f64,
}

impl SplittingLine {
    /// Anchor a new line at `anchor` inside `bounds`
    pub fn new(
        direction: Direction,
        anchor: Vec2,
        now: f64,
        bounds: &Rect,
        region_id: u32,
        speed: f32,
    ) -> Self {
        let (min, max) = bounds.span(direction);
        let along = direction.parallel(anchor).clamp(min, max);
        Self {
            direction,
            perp_offset: direction.perpendicular(anchor),
            start: along,
            end: along,
            min,
            max,
            speed,
            region_id,
            last_update: now,
        }
    }

    /// Grow both ends by the time elapsed since the last update.
    ///
    /// Returns true once both ends have reached the region bounds.
    pub fn advance(&mut self, now: f64) -> bool {
        if now > self.last_update {
            let delta = self.speed * (now - self.last_update) as f32;
            self.last_update = now;
            self.start = (self.start - delta).max(self.min);
            self.end = (self.end + delta).min(self.max);
        }
        self.is_complete()
    }

    pub fn is_complete(&self) -> bool {
        self.start == self.min && self.end == self.max
    }

    /// Fraction of the region span covered, 1.0 at completion
    pub fn progress(&self) -> f32 {
        (self.end - self.start) / (self.max - self.min)
    }

    pub fn intersects_ball(&self, ball: &Ball) -> bool {
        self.collide(ball).hit
    }

    pub fn collide(&self, ball: &Ball) -> CollisionResult {
        ball_line_collision(ball, self)
    }

    /// Degenerate (zero-thickness) rectangle covering the current extent
    pub fn rect(&self) -> Rect {
        match self.direction {
            Direction::Horizontal => {
                Rect::new(self.start, self.perp_offset, self.end, self.perp_offset)
            }
            Direction::Vertical => {
                Rect::new(self.perp_offset, self.start, self.perp_offset, self.end)
            }
        }
    }

    /// Restart the elapsed-time clock at `now` (resume / restore)
    pub fn rebase(&mut self, now: f64) {
        self.last_update = now;
    }

    /// Time at which the line completes if nothing interrupts it
    pub fn completion_time(&self) -> f64 {
        let remaining = (self.start - self.min).max(self.max - self.end);
        self.last_update + (remaining / self.speed) as f64
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn perp_offset(&self) -> f32 {
        self.perp_offset
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn end(&self) -> f32 {
        self.end
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn region_id(&self) -> u32 {
        self.region_id
    }

    pub fn last_update(&self) -> f64 {
        self.last_update
    }

    /// Numbers are finite and the extent sits inside `[min, max]`
    pub fn is_consistent(&self) -> bool {
        let finite = [
            self.perp_offset,
            self.start,
            self.end,
            self.min,
            self.max,
            self.speed,
        ]
        .iter()
        .all(|v| v.is_finite());
        finite
            && self.speed > 0.0
            && self.min < self.max
            && self.min <= self.start
            && self.start <= self.end
            && self.end <= self.max
    }

    #[cfg(test)]
    pub(crate) fn set_extent(&mut self, start: f32, end: f32) {
        self.start = start;
        self.end = end;
    }
}
