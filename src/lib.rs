//! Divide & Conquer - bounce balls, split the field, claim the empty parts
//!
//! Core modules:
//! - `sim`: Deterministic simulation kernel (regions, balls, splitting line)
//! - `persistence`: Versioned snapshot save/load
//! - `session`: Lives, levels and game-over policy on top of the kernel
//! - `settings`: Player preferences
//! - `tuning`: Data-driven game balance

pub mod error;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::StateError;
pub use session::{GameSession, SessionEvent};
pub use settings::{Difficulty, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Field dimensions (origin at top-left, y grows downward)
    pub const FIELD_WIDTH: f32 = 300.0;
    pub const FIELD_HEIGHT: f32 = 400.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Ball speed in units per second (direction is randomized)
    pub const BALL_SPEED: f32 = 120.0;

    /// Growth speed of each end of the splitting line, units per second
    pub const LINE_SPEED: f32 = 160.0;

    /// Fraction of the field that must be claimed to advance a level
    pub const LEVEL_UP_THRESHOLD: f32 = 0.8;
    /// A bonus life is awarded whenever the ball count reaches a multiple of this
    pub const BONUS_LIFE_EVERY: u32 = 4;
    /// Balls on the first level of a new game
    pub const NEW_GAME_NUM_BALLS: u32 = 1;

    /// Rejection-sampling budget per ball when placing balls on reset
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 64;

    /// Tolerance for area bookkeeping and containment checks
    pub const EPSILON: f32 = 1e-3;
}
