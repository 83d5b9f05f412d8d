//! Regions: live rectangles of the partition, each owning its balls

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::Rect;
use super::line::SplittingLine;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: u32,
    pub rect: Rect,
    /// Owned balls (sorted by id for determinism)
    pub balls: Vec<Ball>,
}

impl Region {
    pub fn new(id: u32, rect: Rect, balls: Vec<Ball>) -> Self {
        let mut region = Self { id, rect, balls };
        region.normalize_order();
        region
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn area(&self) -> f32 {
        self.rect.area()
    }

    /// Advance every owned ball by `dt`, reflecting off this region's walls
    pub fn advance_balls(&mut self, dt: f32) {
        let bounds = self.rect;
        for ball in &mut self.balls {
            ball.advance(dt, &bounds);
            debug_assert!(
                ball.is_within(&bounds, crate::consts::EPSILON),
                "ball {} escaped region {}",
                ball.id,
                self.id
            );
        }
    }

    /// Cut this region along a completed line into two children.
    ///
    /// Balls go to the child containing their center. A ball sitting exactly
    /// on the cut goes to the larger child (the first child on a tie). Each
    /// ball is then confined to its child's bounds.
    pub fn split(self, line: &SplittingLine, ids: (u32, u32)) -> (Region, Region) {
        debug_assert!(line.is_complete(), "split on an incomplete line");
        debug_assert_eq!(line.region_id(), self.id, "split with a foreign line");

        let (first_rect, second_rect) = self.rect.cut(line.direction(), line.perp_offset());
        let prefer_first = first_rect.area() >= second_rect.area();

        let mut first = Vec::new();
        let mut second = Vec::new();
        for mut ball in self.balls {
            let in_first = first_rect.contains(ball.pos);
            let in_second = second_rect.contains(ball.pos);
            let to_first = match (in_first, in_second) {
                (true, true) => prefer_first,
                (true, false) => true,
                (false, true) => false,
                // Only reachable with a ball already outside the parent
                (false, false) => {
                    line.direction().perpendicular(ball.pos) < line.perp_offset()
                }
            };
            if to_first {
                ball.confine(&first_rect);
                first.push(ball);
            } else {
                ball.confine(&second_rect);
                second.push(ball);
            }
        }

        (
            Region::new(ids.0, first_rect, first),
            Region::new(ids.1, second_rect, second),
        )
    }

    pub fn normalize_order(&mut self) {
        self.balls.sort_by_key(|b| b.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Direction;

    fn completed_line(direction: Direction, anchor: Vec2, bounds: &Rect, region_id: u32) -> SplittingLine {
        let mut line = SplittingLine::new(direction, anchor, 0.0, bounds, region_id, 1000.0);
        assert!(line.advance(10.0));
        line
    }

    fn ball_at(id: u32, x: f32, y: f32) -> Ball {
        Ball::new(id, Vec2::new(x, y), Vec2::new(1.0, 1.0), 2.0)
    }

    #[test]
    fn test_split_partitions_balls() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let region = Region::new(
            1,
            rect,
            vec![ball_at(3, 10.0, 10.0), ball_at(4, 80.0, 90.0), ball_at(5, 20.0, 70.0)],
        );
        let line = completed_line(Direction::Horizontal, Vec2::new(50.0, 40.0), &rect, 1);
        let (top, bottom) = region.split(&line, (10, 11));

        assert_eq!(top.rect, Rect::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(bottom.rect, Rect::new(0.0, 40.0, 100.0, 100.0));
        assert_eq!(top.balls.iter().map(|b| b.id).collect::<Vec<_>>(), vec![3]);
        assert_eq!(bottom.balls.iter().map(|b| b.id).collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(top.id, 10);
        assert_eq!(bottom.id, 11);
    }

    #[test]
    fn test_ball_on_cut_goes_to_larger_child() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let region = Region::new(1, rect, vec![ball_at(1, 70.0, 50.0)]);
        let line = completed_line(Direction::Vertical, Vec2::new(70.0, 50.0), &rect, 1);
        let (left, right) = region.split(&line, (2, 3));

        assert_eq!(left.balls.len(), 1);
        assert!(right.is_empty());
        // Confined off the cut
        assert!(left.balls[0].is_within(&left.rect, 0.0));
        assert_eq!(left.balls[0].pos.x, 68.0);
    }

    #[test]
    fn test_tie_on_equal_halves_prefers_first() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let region = Region::new(1, rect, vec![ball_at(1, 30.0, 50.0)]);
        let line = completed_line(Direction::Horizontal, Vec2::new(30.0, 50.0), &rect, 1);
        let (top, bottom) = region.split(&line, (2, 3));
        assert_eq!(top.balls.len(), 1);
        assert!(bottom.is_empty());
    }

    #[test]
    fn test_split_conserves_balls_and_area() {
        let rect = Rect::new(0.0, 0.0, 200.0, 100.0);
        let balls: Vec<Ball> = (0..20)
            .map(|i| ball_at(i, 5.0 + i as f32 * 9.5, 5.0 + (i * 37 % 90) as f32))
            .collect();
        let region = Region::new(1, rect, balls);
        let line = completed_line(Direction::Vertical, Vec2::new(77.0, 20.0), &rect, 1);
        let (a, b) = region.split(&line, (2, 3));
        assert_eq!(a.balls.len() + b.balls.len(), 20);
        assert!((a.area() + b.area() - rect.area()).abs() < 1e-3);
        for ball in &a.balls {
            assert!(ball.pos.x < 77.0);
        }
        for ball in &b.balls {
            assert!(ball.pos.x > 77.0);
        }
    }

    #[test]
    fn test_advance_keeps_balls_inside() {
        let rect = Rect::new(0.0, 0.0, 50.0, 50.0);
        let mut region = Region::new(
            1,
            rect,
            vec![Ball::new(1, Vec2::new(25.0, 25.0), Vec2::new(300.0, -170.0), 3.0)],
        );
        for _ in 0..100 {
            region.advance_balls(0.05);
            assert!(region.balls[0].is_within(&rect, 1e-4));
        }
    }
}
