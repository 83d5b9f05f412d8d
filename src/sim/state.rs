//! Engine mode, notifications and the persisted snapshot
//!
//! Everything needed to rebuild an engine after a restart lives in `GameState`.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::geometry::Rect;
use super::line::SplittingLine;
use super::region::Region;

/// Current mode of the partition engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineMode {
    /// Balls move, no active line
    Bouncing,
    /// Exactly one line is growing
    Splitting,
    /// Game over: ticks are ignored
    Paused,
    /// Suspended by the player, resumable
    PausedByUser,
}

impl EngineMode {
    pub fn is_running(self) -> bool {
        matches!(self, EngineMode::Bouncing | EngineMode::Splitting)
    }
}

/// Notification emitted synchronously by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A completed line replaced `removed` with two children.
    /// `claimed[i]` is set when child `i` had no balls and was claimed at once.
    RegionsChanged {
        removed: Rect,
        added: [Rect; 2],
        claimed: [bool; 2],
    },
    /// A ball touched the growing line; the line is gone and a life was lost
    BallHitLine { ball: Ball, point: Vec2 },
    /// Claimed fraction of the field, in `[0, 1]`
    AreaChanged { fraction_filled: f32 },
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the current stream
    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::new(self.seed, self.stream)
    }

    /// Move on to a fresh stream (called once per reset)
    pub fn advance(&mut self) {
        self.stream = self.stream.wrapping_add(1);
    }
}

/// Complete engine snapshot (inert value, written and read as a whole)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Outer bounds of the play area
    pub field: Rect,
    pub mode: EngineMode,
    pub lives: u32,
    /// Balls placed on the current level
    pub ball_count: u32,
    /// Live regions (sorted by id)
    pub regions: Vec<Region>,
    /// Ids of regions created by the most recent split
    #[serde(default)]
    pub new_regions: Vec<u32>,
    /// In-flight line, present only while splitting (or paused mid-split)
    pub line: Option<SplittingLine>,
    /// Area of regions claimed so far this level
    pub claimed_area: f32,
    pub rng_state: RngState,
    /// Next entity ID
    pub next_id: u32,
}
