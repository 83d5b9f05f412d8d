//! Partition engine: the tick-driven state machine
//!
//! Owns the live regions, their balls and the single in-flight splitting
//! line. All time comes in through explicit timestamps (seconds); the engine
//! never reads a clock. Notifications are queued during each call and drained
//! by the caller with [`PartitionEngine::drain_events`].

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::ball::Ball;
use super::collision::CollisionResult;
use super::geometry::{Direction, Rect};
use super::line::SplittingLine;
use super::region::Region;
use super::state::{EngineEvent, EngineMode, GameState, RngState};
use crate::consts::EPSILON;
use crate::error::StateError;
use crate::tuning::Tuning;

#[derive(Debug, Clone)]
pub struct PartitionEngine {
    tuning: Tuning,
    field: Rect,
    mode: EngineMode,
    lives: u32,
    ball_count: u32,
    /// Live regions (sorted by id for determinism)
    regions: Vec<Region>,
    new_regions: Vec<u32>,
    line: Option<SplittingLine>,
    claimed_area: f32,
    rng_state: RngState,
    next_id: u32,
    /// Timestamp of the last tick. `None` after a restore: the next
    /// `tick`/`resume` rebases every clock to its `now`.
    clock: Option<f64>,
    events: Vec<EngineEvent>,
}

impl PartitionEngine {
    /// Create an engine holding a single empty region spanning the field.
    ///
    /// Unusable tuning values are replaced by defaults. Call
    /// [`reset`](Self::reset) to place balls and start the clock.
    pub fn new(tuning: Tuning, seed: u64) -> Self {
        let tuning = tuning.sanitized();
        let field = tuning.field;
        Self {
            tuning,
            field,
            mode: EngineMode::Bouncing,
            lives: 0,
            ball_count: 0,
            regions: vec![Region::new(1, field, Vec::new())],
            new_regions: Vec::new(),
            line: None,
            claimed_area: 0.0,
            rng_state: RngState::new(seed),
            next_id: 2,
            clock: None,
            events: Vec::new(),
        }
    }

    /// Allocate a new entity ID
    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start a fresh level: one region spanning the field with `ball_count`
    /// randomly placed balls, no line, `Bouncing`.
    ///
    /// A ball-less field stays live so it can still be split.
    pub fn reset(&mut self, now: f64, ball_count: u32) {
        self.rng_state.advance();
        let mut rng = self.rng_state.to_rng();

        let radius = self.tuning.ball_radius;
        let speed = self.tuning.ball_speed_for(ball_count);
        let (lo, hi) = (
            Vec2::new(self.field.left + radius, self.field.top + radius),
            Vec2::new(self.field.right - radius, self.field.bottom - radius),
        );
        let center = self.field.center();
        let sample = |rng: &mut rand_pcg::Pcg32| {
            let x = if lo.x < hi.x { rng.random_range(lo.x..=hi.x) } else { center.x };
            let y = if lo.y < hi.y { rng.random_range(lo.y..=hi.y) } else { center.y };
            Vec2::new(x, y)
        };

        let mut balls: Vec<Ball> = Vec::with_capacity(ball_count as usize);
        for _ in 0..ball_count {
            let mut pos = sample(&mut rng);
            for _ in 1..self.tuning.max_placement_attempts {
                let clear = balls
                    .iter()
                    .all(|b| b.pos.distance(pos) > b.radius + radius);
                if clear {
                    break;
                }
                pos = sample(&mut rng);
            }
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            let id = self.next_entity_id();
            balls.push(Ball::new(id, pos, Vec2::from_angle(angle) * speed, radius));
        }

        let region_id = self.next_entity_id();
        self.regions = vec![Region::new(region_id, self.field, balls)];
        self.new_regions.clear();
        self.line = None;
        self.claimed_area = 0.0;
        self.ball_count = ball_count;
        self.mode = EngineMode::Bouncing;
        self.clock = Some(now);

        log::info!(
            "Reset: {} balls, speed {}, field {}x{}",
            ball_count,
            speed,
            self.field.width(),
            self.field.height()
        );
        self.events.push(EngineEvent::AreaChanged {
            fraction_filled: 0.0,
        });
    }

    /// Advance the simulation to `now`. Ignored unless `Bouncing`/`Splitting`.
    pub fn tick(&mut self, now: f64) {
        if !self.mode.is_running() {
            return;
        }
        self.new_regions.clear();

        let dt = match self.clock {
            Some(last) if now > last => (now - last) as f32,
            Some(_) => 0.0,
            None => {
                self.rebase(now);
                0.0
            }
        };
        if now > self.clock.unwrap_or(now) {
            self.clock = Some(now);
        }

        for region in &mut self.regions {
            region.advance_balls(dt);
        }

        if self.mode == EngineMode::Splitting {
            self.update_line(now);
        }

        debug_assert!(
            self.validate().is_ok(),
            "invariant violated after tick: {:?}",
            self.validate()
        );
    }

    /// Test the carved region's balls against the line, then grow it.
    fn update_line(&mut self, now: f64) {
        let Some(line) = self.line.as_ref() else {
            self.mode = EngineMode::Bouncing;
            return;
        };
        let Some(index) = self.regions.iter().position(|r| r.id == line.region_id()) else {
            debug_assert!(false, "line references missing region {}", line.region_id());
            log::warn!("Dropping line for missing region {}", line.region_id());
            self.line = None;
            self.mode = EngineMode::Bouncing;
            return;
        };

        // Intersection wins over completion: test before growing
        if let Some(hit) = self.line_hit(index) {
            self.invalidate_line(hit);
            return;
        }

        let complete = match self.line.as_mut() {
            Some(line) => line.advance(now),
            None => false,
        };
        if !complete {
            return;
        }
        // The final growth may have reached a ball: a split never cuts one
        if let Some(hit) = self.line_hit(index) {
            self.invalidate_line(hit);
            return;
        }
        if let Some(line) = self.line.take() {
            self.split_region(index, &line);
        }
        self.mode = EngineMode::Bouncing;
    }

    /// First ball of region `index` touching the current line extent
    fn line_hit(&self, index: usize) -> Option<(Ball, CollisionResult)> {
        let line = self.line.as_ref()?;
        self.regions[index].balls.iter().find_map(|ball| {
            let result = line.collide(ball);
            result.hit.then(|| (ball.clone(), result))
        })
    }

    fn invalidate_line(&mut self, (ball, result): (Ball, CollisionResult)) {
        self.line = None;
        self.lives = self.lives.saturating_sub(1);
        self.mode = EngineMode::Bouncing;
        log::info!(
            "Ball {} hit the line at ({:.1}, {:.1}) depth {:.2}, {} lives left",
            ball.id,
            result.point.x,
            result.point.y,
            result.penetration,
            self.lives
        );
        self.events.push(EngineEvent::BallHitLine {
            ball,
            point: result.point,
        });
    }

    /// Replace region `index` by its two children; empty children are claimed.
    fn split_region(&mut self, index: usize, line: &SplittingLine) {
        let parent = self.regions.remove(index);
        let removed = parent.rect;
        let ids = (self.next_entity_id(), self.next_entity_id());
        let (first, second) = parent.split(line, ids);
        let added = [first.rect, second.rect];

        let mut claimed = [false; 2];
        for (slot, child) in [first, second].into_iter().enumerate() {
            if child.is_empty() {
                self.claimed_area += child.area();
                claimed[slot] = true;
            } else {
                self.new_regions.push(child.id);
                self.regions.push(child);
            }
        }
        self.regions.sort_by_key(|r| r.id);

        let fraction_filled = self.percentage_filled();
        log::info!(
            "Split {:?} at {:.1}: claimed {:?}, {:.1}% filled",
            line.direction(),
            line.perp_offset(),
            claimed,
            fraction_filled * 100.0
        );
        self.events.push(EngineEvent::RegionsChanged {
            removed,
            added,
            claimed,
        });
        self.events.push(EngineEvent::AreaChanged { fraction_filled });
    }

    /// Start a line at `point` growing along `direction`.
    ///
    /// Refused (returns false) unless the engine is `Bouncing` and `point` is
    /// strictly inside a live region. The line's clock starts at the last
    /// tick time.
    pub fn request_line(&mut self, direction: Direction, point: Vec2) -> bool {
        if self.mode != EngineMode::Bouncing || self.line.is_some() {
            log::debug!("Line request refused in mode {:?}", self.mode);
            return false;
        }
        let Some(region) = self.regions.iter().find(|r| r.rect.contains_interior(point)) else {
            log::debug!("Line request at {:?} is not inside a live region", point);
            return false;
        };

        let line = SplittingLine::new(
            direction,
            point,
            self.clock.unwrap_or(0.0),
            &region.rect,
            region.id,
            self.tuning.line_speed,
        );
        log::debug!(
            "Line started in region {}, completes at {:.2}s: {:?}",
            region.id,
            line.completion_time(),
            line
        );
        self.line = Some(line);
        self.mode = EngineMode::Splitting;
        true
    }

    /// Player suspend. Returns false if not running.
    pub fn pause(&mut self) -> bool {
        if !self.mode.is_running() {
            return false;
        }
        self.mode = EngineMode::PausedByUser;
        true
    }

    /// Leave `PausedByUser`; time spent paused does not count as elapsed.
    pub fn resume(&mut self, now: f64) -> bool {
        if self.mode != EngineMode::PausedByUser {
            return false;
        }
        self.rebase(now);
        self.mode = if self.line.is_some() {
            EngineMode::Splitting
        } else {
            EngineMode::Bouncing
        };
        true
    }

    /// Stop for good (lives exhausted). Only `reset` leaves this mode.
    pub fn game_over(&mut self) {
        self.mode = EngineMode::Paused;
    }

    fn rebase(&mut self, now: f64) {
        self.clock = Some(now);
        if let Some(line) = self.line.as_mut() {
            line.rebase(now);
        }
    }

    pub fn add_life(&mut self) {
        self.lives = self.lives.saturating_add(1);
    }

    pub fn set_lives(&mut self, lives: u32) {
        self.lives = lives;
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn ball_count(&self) -> u32 {
        self.ball_count
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn field(&self) -> Rect {
        self.field
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn balls(&self) -> impl Iterator<Item = &Ball> {
        self.regions.iter().flat_map(|r| r.balls.iter())
    }

    /// Regions created by the most recent split (until the next tick)
    pub fn newly_created(&self) -> impl Iterator<Item = &Region> {
        self.regions
            .iter()
            .filter(|r| self.new_regions.contains(&r.id))
    }

    pub fn line(&self) -> Option<&SplittingLine> {
        self.line.as_ref()
    }

    pub fn line_progress(&self) -> Option<f32> {
        self.line.as_ref().map(SplittingLine::progress)
    }

    pub fn line_rect(&self) -> Option<Rect> {
        self.line.as_ref().map(SplittingLine::rect)
    }

    pub fn claimed_area(&self) -> f32 {
        self.claimed_area
    }

    /// Claimed fraction of the field, in `[0, 1]`
    pub fn percentage_filled(&self) -> f32 {
        (self.claimed_area / self.field.area()).clamp(0.0, 1.0)
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Copy out the persistable state
    pub fn snapshot(&self) -> GameState {
        GameState {
            field: self.field,
            mode: self.mode,
            lives: self.lives,
            ball_count: self.ball_count,
            regions: self.regions.clone(),
            new_regions: self.new_regions.clone(),
            line: self.line.clone(),
            claimed_area: self.claimed_area,
            rng_state: self.rng_state.clone(),
            next_id: self.next_id,
        }
    }

    /// Rebuild an engine from a snapshot, rejecting inconsistent state.
    ///
    /// The restored engine has no clock; the next `tick`/`resume` rebases it.
    pub fn from_snapshot(tuning: Tuning, state: GameState) -> Result<Self, StateError> {
        let mut regions = state.regions;
        regions.sort_by_key(|r| r.id);
        for region in &mut regions {
            region.normalize_order();
        }

        let engine = Self {
            tuning: tuning.sanitized(),
            field: state.field,
            mode: state.mode,
            lives: state.lives,
            ball_count: state.ball_count,
            regions,
            new_regions: state.new_regions,
            line: state.line,
            claimed_area: state.claimed_area,
            rng_state: state.rng_state,
            next_id: state.next_id,
            clock: None,
            events: Vec::new(),
        };
        engine.validate()?;
        Ok(engine)
    }

    pub fn serialize(&self) -> Result<String, StateError> {
        crate::persistence::encode(&self.snapshot())
    }

    pub fn deserialize(tuning: Tuning, blob: &str) -> Result<Self, StateError> {
        let state = crate::persistence::decode(blob)?;
        Self::from_snapshot(tuning, state)
    }

    /// Check every structural invariant of the partition
    pub fn validate(&self) -> Result<(), StateError> {
        if !self.field.is_valid() {
            return Err(StateError::InvalidField);
        }

        let mut ids = HashSet::new();
        for region in &self.regions {
            if !ids.insert(region.id) {
                return Err(StateError::DuplicateId(region.id));
            }
            for ball in &region.balls {
                if !ids.insert(ball.id) {
                    return Err(StateError::DuplicateId(ball.id));
                }
            }
        }
        if ids.iter().any(|&id| id >= self.next_id) {
            return Err(StateError::StaleNextId(self.next_id));
        }

        for region in &self.regions {
            if !region.rect.is_valid() || !self.field.encloses(&region.rect, EPSILON) {
                return Err(StateError::RegionOutOfField(region.id));
            }
        }
        for (i, a) in self.regions.iter().enumerate() {
            for b in &self.regions[i + 1..] {
                if a.rect.overlaps(&b.rect, EPSILON) {
                    return Err(StateError::OverlappingRegions(a.id, b.id));
                }
            }
        }

        if !(self.claimed_area.is_finite() && self.claimed_area >= 0.0) {
            return Err(StateError::InvalidClaimedArea);
        }
        let expected = self.field.area();
        let live: f64 = self.regions.iter().map(|r| r.area() as f64).sum();
        let actual = (live + self.claimed_area as f64) as f32;
        if (actual - expected).abs() > expected * 1e-4 {
            return Err(StateError::AreaMismatch { expected, actual });
        }

        for region in &self.regions {
            for ball in &region.balls {
                let finite = ball.pos.is_finite() && ball.vel.is_finite() && ball.radius.is_finite();
                if !finite || ball.radius <= 0.0 {
                    return Err(StateError::InvalidBall(ball.id));
                }
                if !ball.is_within(&region.rect, EPSILON) {
                    return Err(StateError::BallOutsideRegion {
                        ball: ball.id,
                        region: region.id,
                    });
                }
            }
        }

        match (self.mode, &self.line) {
            (EngineMode::Splitting, None) | (EngineMode::Bouncing, Some(_)) => {
                return Err(StateError::ModeMismatch { mode: self.mode });
            }
            _ => {}
        }
        if let Some(line) = &self.line {
            if !line.is_consistent() {
                return Err(StateError::InvalidLine("extent outside bounds"));
            }
            let region = self
                .regions
                .iter()
                .find(|r| r.id == line.region_id())
                .ok_or(StateError::LineRegionMissing(line.region_id()))?;
            if region.rect.span(line.direction()) != (line.min(), line.max()) {
                return Err(StateError::InvalidLine("bounds differ from region"));
            }
            let (lo, hi) = match line.direction() {
                Direction::Horizontal => (region.rect.top, region.rect.bottom),
                Direction::Vertical => (region.rect.left, region.rect.right),
            };
            if line.perp_offset() <= lo || line.perp_offset() >= hi {
                return Err(StateError::InvalidLine("anchor outside region interior"));
            }
        }

        Ok(())
    }
}
