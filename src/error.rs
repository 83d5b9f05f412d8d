//! Error types for snapshot restore and state validation

use thiserror::Error;

use crate::sim::EngineMode;

/// Why an engine state (restored or live) was rejected
#[derive(Error, Debug)]
pub enum StateError {
    /// Not JSON, or JSON of the wrong shape
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unsupported snapshot version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("invalid field bounds")]
    InvalidField,

    #[error("duplicate entity id {0}")]
    DuplicateId(u32),

    /// Next entity id would collide with an existing one
    #[error("next id {0} collides with existing ids")]
    StaleNextId(u32),

    #[error("region {0} is degenerate or outside the field")]
    RegionOutOfField(u32),

    #[error("regions {0} and {1} overlap")]
    OverlappingRegions(u32, u32),

    /// Live plus claimed area does not add up to the field area
    #[error("live plus claimed area {actual} does not match field area {expected}")]
    AreaMismatch { expected: f32, actual: f32 },

    #[error("claimed area is negative or non-finite")]
    InvalidClaimedArea,

    #[error("ball {0} has non-finite or non-positive values")]
    InvalidBall(u32),

    #[error("ball {ball} lies outside region {region}")]
    BallOutsideRegion { ball: u32, region: u32 },

    #[error("mode {mode:?} does not match line presence")]
    ModeMismatch { mode: EngineMode },

    #[error("splitting line references missing region {0}")]
    LineRegionMissing(u32),

    #[error("inconsistent splitting line: {0}")]
    InvalidLine(&'static str),
}
