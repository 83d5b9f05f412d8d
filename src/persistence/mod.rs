//! Save/load of engine snapshots
//!
//! Features:
//! - Versioned JSON envelope
//! - Version checked before the body is parsed
//! - Structural validation happens on engine restore, never here

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::sim::GameState;

/// Current envelope version
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct Header {
    version: u32,
}

#[derive(Deserialize)]
struct Envelope {
    state: GameState,
}

/// Encode a snapshot as a versioned JSON document
pub fn encode(state: &GameState) -> Result<String, StateError> {
    let envelope = EnvelopeRef {
        version: SNAPSHOT_VERSION,
        state,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode a versioned JSON document back into a snapshot
pub fn decode(blob: &str) -> Result<GameState, StateError> {
    let header: Header = serde_json::from_str(blob)?;
    if header.version != SNAPSHOT_VERSION {
        log::warn!("Rejecting snapshot version {}", header.version);
        return Err(StateError::UnsupportedVersion {
            found: header.version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let envelope: Envelope = serde_json::from_str(blob)?;
    Ok(envelope.state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Direction, EngineMode, PartitionEngine};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn splitting_engine() -> PartitionEngine {
        let mut engine = PartitionEngine::new(Tuning::default(), 11);
        engine.set_lives(4);
        engine.reset(0.0, 3);
        engine.tick(0.1);
        // Start a line without ticking it
        let field = engine.field();
        let point = Vec2::new(field.left + 1.0, field.top + 1.0);
        assert!(engine.request_line(Direction::Vertical, point));
        engine
    }

    #[test]
    fn test_roundtrip_preserves_state() {
        let engine = splitting_engine();
        let blob = engine.serialize().unwrap();
        let restored = PartitionEngine::deserialize(Tuning::default(), &blob).unwrap();
        assert_eq!(restored.snapshot(), engine.snapshot());
        assert_eq!(restored.mode(), EngineMode::Splitting);
        assert_eq!(restored.lives(), 4);
        assert_eq!(restored.ball_count(), 3);
    }

    #[test]
    fn test_restore_rebases_clock() {
        let mut engine = PartitionEngine::new(Tuning::default(), 5);
        engine.reset(0.0, 0);
        assert!(engine.request_line(Direction::Horizontal, Vec2::new(150.0, 200.0)));
        engine.tick(0.25);
        let line_before = engine.line().cloned().unwrap();

        let blob = engine.serialize().unwrap();
        let mut restored = PartitionEngine::deserialize(Tuning::default(), &blob).unwrap();

        // Hours later: the first tick only rebases
        restored.tick(10_000.0);
        let line = restored.line().unwrap();
        assert_eq!(line.start(), line_before.start());
        assert_eq!(line.end(), line_before.end());

        restored.tick(10_000.25);
        assert!(restored.line().unwrap().end() > line_before.end());
    }

    #[test]
    fn test_corrupt_blob_is_malformed() {
        let result = PartitionEngine::deserialize(Tuning::default(), "{not json");
        assert!(matches!(result, Err(StateError::Malformed(_))));

        let result = PartitionEngine::deserialize(Tuning::default(), r#"{"version":1}"#);
        assert!(matches!(result, Err(StateError::Malformed(_))));
    }

    #[test]
    fn test_unknown_version_rejected() {
        let engine = splitting_engine();
        let blob = engine.serialize().unwrap().replacen(
            &format!("\"version\":{}", SNAPSHOT_VERSION),
            "\"version\":99",
            1,
        );
        let result = PartitionEngine::deserialize(Tuning::default(), &blob);
        assert!(matches!(
            result,
            Err(StateError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_inconsistent_state_rejected() {
        let engine = splitting_engine();

        let mut state = engine.snapshot();
        state.line = None;
        let blob = encode(&state).unwrap();
        assert!(matches!(
            PartitionEngine::deserialize(Tuning::default(), &blob),
            Err(StateError::ModeMismatch { .. })
        ));

        let mut state = engine.snapshot();
        state.claimed_area = 500.0;
        let blob = encode(&state).unwrap();
        assert!(matches!(
            PartitionEngine::deserialize(Tuning::default(), &blob),
            Err(StateError::AreaMismatch { .. })
        ));

        let mut state = engine.snapshot();
        state.regions[0].balls[0].pos = Vec2::new(-50.0, -50.0);
        let blob = encode(&state).unwrap();
        assert!(matches!(
            PartitionEngine::deserialize(Tuning::default(), &blob),
            Err(StateError::BallOutsideRegion { .. })
        ));

        let mut state = engine.snapshot();
        let copy = state.regions[0].clone();
        state.regions.push(copy);
        let blob = encode(&state).unwrap();
        assert!(matches!(
            PartitionEngine::deserialize(Tuning::default(), &blob),
            Err(StateError::DuplicateId(_))
        ));
    }
}
