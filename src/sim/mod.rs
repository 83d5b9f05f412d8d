//! Deterministic simulation kernel
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only through caller-supplied timestamps
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod ball;
pub mod collision;
pub mod engine;
pub mod geometry;
pub mod line;
pub mod region;
pub mod state;

pub use ball::Ball;
pub use collision::{CollisionResult, ball_line_collision};
pub use engine::PartitionEngine;
pub use geometry::{Direction, Rect};
pub use line::SplittingLine;
pub use region::Region;
pub use state::{EngineEvent, EngineMode, GameState, RngState};
