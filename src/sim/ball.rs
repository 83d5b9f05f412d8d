//! Ball motion and wall reflection

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// A ball entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, radius: f32) -> Self {
        Self {
            id,
            pos,
            vel,
            radius,
        }
    }

    /// Move by `vel * dt` and reflect off the walls of `bounds`.
    ///
    /// Each axis is handled independently, so a corner hit flips both
    /// components in the same step. Returns true if any wall was hit.
    pub fn advance(&mut self, dt: f32, bounds: &Rect) -> bool {
        self.pos += self.vel * dt;
        let hit_x = reflect_axis(
            &mut self.pos.x,
            &mut self.vel.x,
            bounds.left,
            bounds.right,
            self.radius,
        );
        let hit_y = reflect_axis(
            &mut self.pos.y,
            &mut self.vel.y,
            bounds.top,
            bounds.bottom,
            self.radius,
        );
        hit_x || hit_y
    }

    /// Clamp the ball so its extent lies within `bounds` (velocity untouched)
    pub fn confine(&mut self, bounds: &Rect) {
        self.pos.x = clamp_center(self.pos.x, bounds.left, bounds.right, self.radius);
        self.pos.y = clamp_center(self.pos.y, bounds.top, bounds.bottom, self.radius);
    }

    /// Ball extent lies within `bounds`, allowing `tolerance` slack
    pub fn is_within(&self, bounds: &Rect, tolerance: f32) -> bool {
        let fits = |p: f32, lo: f32, hi: f32| {
            if hi - lo < 2.0 * self.radius {
                // Too narrow to hold the ball: the center is parked mid-way
                (p - (lo + hi) * 0.5).abs() <= tolerance
            } else {
                p - self.radius >= lo - tolerance && p + self.radius <= hi + tolerance
            }
        };
        fits(self.pos.x, bounds.left, bounds.right) && fits(self.pos.y, bounds.top, bounds.bottom)
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

fn clamp_center(p: f32, lo: f32, hi: f32, radius: f32) -> f32 {
    if hi - lo < 2.0 * radius {
        (lo + hi) * 0.5
    } else {
        p.clamp(lo + radius, hi - radius)
    }
}

fn reflect_axis(p: &mut f32, v: &mut f32, lo: f32, hi: f32, radius: f32) -> bool {
    if hi - lo < 2.0 * radius {
        *p = (lo + hi) * 0.5;
        *v = -*v;
        return true;
    }
    if *p - radius < lo {
        *p = lo + radius;
        *v = v.abs();
        true
    } else if *p + radius > hi {
        *p = hi - radius;
        *v = -v.abs();
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_free_motion() {
        let mut ball = Ball::new(1, Vec2::new(50.0, 50.0), Vec2::new(10.0, -5.0), 4.0);
        assert!(!ball.advance(1.0, &field()));
        assert_eq!(ball.pos, Vec2::new(60.0, 45.0));
        assert_eq!(ball.vel, Vec2::new(10.0, -5.0));
    }

    #[test]
    fn test_wall_reflection_is_elastic() {
        let mut ball = Ball::new(1, Vec2::new(90.0, 50.0), Vec2::new(20.0, 0.0), 4.0);
        assert!(ball.advance(1.0, &field()));
        assert_eq!(ball.pos.x, 96.0);
        assert_eq!(ball.vel, Vec2::new(-20.0, 0.0));
        assert!((ball.speed() - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let mut ball = Ball::new(1, Vec2::new(5.0, 5.0), Vec2::new(-10.0, -10.0), 4.0);
        assert!(ball.advance(1.0, &field()));
        assert_eq!(ball.pos, Vec2::new(4.0, 4.0));
        assert_eq!(ball.vel, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn test_large_step_stays_contained() {
        let mut ball = Ball::new(1, Vec2::new(50.0, 50.0), Vec2::new(1000.0, -700.0), 4.0);
        ball.advance(10.0, &field());
        assert!(ball.is_within(&field(), 0.0));
    }

    #[test]
    fn test_confine_clamps_position_only() {
        let mut ball = Ball::new(1, Vec2::new(99.0, -3.0), Vec2::new(1.0, 1.0), 4.0);
        ball.confine(&field());
        assert_eq!(ball.pos, Vec2::new(96.0, 4.0));
        assert_eq!(ball.vel, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_narrow_bounds_park_center() {
        let narrow = Rect::new(0.0, 0.0, 6.0, 100.0);
        let mut ball = Ball::new(1, Vec2::new(3.0, 50.0), Vec2::new(5.0, 0.0), 4.0);
        ball.advance(0.1, &narrow);
        assert_eq!(ball.pos.x, 3.0);
        assert!(ball.is_within(&narrow, 1e-6));
    }
}
