//! Collision detection between balls and the growing splitting line
//!
//! One observable position per object per tick: no sub-stepping and no
//! continuous-time root finding. A fast, small ball can tunnel through the
//! line within a single tick.

use glam::Vec2;

use super::ball::Ball;
use super::line::SplittingLine;

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Point on the line closest to the ball center (if hit)
    pub point: Vec2,
    /// Penetration depth along the perpendicular axis
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check a ball against the current extent of a splitting line.
///
/// Hits when the ball's radius reaches the line's fixed perpendicular
/// coordinate while the ball center lies within `[start, end]` along the
/// growth axis.
pub fn ball_line_collision(ball: &Ball, line: &SplittingLine) -> CollisionResult {
    let direction = line.direction();
    let along = direction.parallel(ball.pos);
    let across = direction.perpendicular(ball.pos);

    let distance = (across - line.perp_offset()).abs();
    if distance > ball.radius {
        return CollisionResult::miss();
    }
    if along < line.start() || along > line.end() {
        return CollisionResult::miss();
    }

    CollisionResult {
        hit: true,
        point: direction.point(along, line.perp_offset()),
        penetration: ball.radius - distance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::{Direction, Rect};

    fn line_spanning(start: f32, end: f32) -> SplittingLine {
        // Horizontal line at y = 50 inside a 100x100 region
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut line = SplittingLine::new(
            Direction::Horizontal,
            Vec2::new((start + end) * 0.5, 50.0),
            0.0,
            &region,
            0,
            10.0,
        );
        line.set_extent(start, end);
        line
    }

    #[test]
    fn test_ball_on_line_hits() {
        let line = line_spanning(20.0, 60.0);
        let ball = Ball::new(1, Vec2::new(40.0, 53.0), Vec2::ZERO, 5.0);
        let result = ball_line_collision(&ball, &line);
        assert!(result.hit);
        assert_eq!(result.point, Vec2::new(40.0, 50.0));
        assert!((result.penetration - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_ball_too_far_misses() {
        let line = line_spanning(20.0, 60.0);
        let ball = Ball::new(1, Vec2::new(40.0, 56.0), Vec2::ZERO, 5.0);
        assert!(!ball_line_collision(&ball, &line).hit);
    }

    #[test]
    fn test_ball_beyond_line_end_misses() {
        let line = line_spanning(20.0, 60.0);
        let ball = Ball::new(1, Vec2::new(61.0, 50.0), Vec2::ZERO, 5.0);
        assert!(!ball_line_collision(&ball, &line).hit);
    }

    #[test]
    fn test_vertical_line() {
        let region = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut line = SplittingLine::new(
            Direction::Vertical,
            Vec2::new(30.0, 50.0),
            0.0,
            &region,
            0,
            10.0,
        );
        line.set_extent(10.0, 90.0);
        let ball = Ball::new(1, Vec2::new(27.0, 80.0), Vec2::ZERO, 4.0);
        let result = ball_line_collision(&ball, &line);
        assert!(result.hit);
        assert_eq!(result.point, Vec2::new(30.0, 80.0));
    }
}
