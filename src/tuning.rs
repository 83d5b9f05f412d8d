//! Data-driven game balance
//!
//! Loaded from the settings file; every field falls back to `consts`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Rect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Outer bounds of the play area
    pub field: Rect,
    pub ball_radius: f32,
    /// Ball speed in units per second
    pub ball_speed: f32,
    /// Extra ball speed per ball beyond the first (0 = constant across levels)
    pub ball_speed_per_level: f32,
    /// Growth speed of each line end, units per second
    pub line_speed: f32,
    /// Claimed fraction that triggers a level up
    pub level_up_threshold: f32,
    pub bonus_life_every: u32,
    pub new_game_balls: u32,
    pub max_placement_attempts: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field: Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT),
            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            ball_speed_per_level: 0.0,
            line_speed: LINE_SPEED,
            level_up_threshold: LEVEL_UP_THRESHOLD,
            bonus_life_every: BONUS_LIFE_EVERY,
            new_game_balls: NEW_GAME_NUM_BALLS,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
        }
    }
}

impl Tuning {
    /// Ball speed for a level with `ball_count` balls
    pub fn ball_speed_for(&self, ball_count: u32) -> f32 {
        let extra = ball_count.saturating_sub(1) as f32 * self.ball_speed_per_level;
        (self.ball_speed + extra).max(0.0)
    }

    /// Replace unusable values with defaults, logging each replacement
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.field.is_valid() {
            log::warn!("Invalid field {:?}, using default", self.field);
            self.field = defaults.field;
        }
        if !(self.ball_radius.is_finite() && self.ball_radius > 0.0) {
            log::warn!("Invalid ball radius {}, using default", self.ball_radius);
            self.ball_radius = defaults.ball_radius;
        }
        if !(self.ball_speed.is_finite() && self.ball_speed >= 0.0) {
            log::warn!("Invalid ball speed {}, using default", self.ball_speed);
            self.ball_speed = defaults.ball_speed;
        }
        if !self.ball_speed_per_level.is_finite() {
            self.ball_speed_per_level = defaults.ball_speed_per_level;
        }
        if !(self.line_speed.is_finite() && self.line_speed > 0.0) {
            log::warn!("Invalid line speed {}, using default", self.line_speed);
            self.line_speed = defaults.line_speed;
        }
        if !(self.level_up_threshold > 0.0 && self.level_up_threshold <= 1.0) {
            self.level_up_threshold = defaults.level_up_threshold;
        }
        if self.bonus_life_every == 0 {
            self.bonus_life_every = defaults.bonus_life_every;
        }
        if self.max_placement_attempts == 0 {
            self.max_placement_attempts = defaults.max_placement_attempts;
        }
        self
    }
}
