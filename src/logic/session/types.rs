//! Session Types
//!
//! Data structures only - no logic.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{DEFAULT_DETECTION_INTERVAL_MS, DEFAULT_DETECTION_THRESHOLD};
use crate::logic::recognizer::types::RankedBelief;

// ============================================================================
// OBSERVATIONS
// ============================================================================

/// Axis-aligned box in pixel coordinates: x, y, width, height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One raw detector result for a single tick. Consumed once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// Class label as produced by the generic classifier, e.g. "cup"
    pub label: String,
    /// Classifier confidence in [0, 1]
    pub confidence: f32,
    pub bbox: BoundingBox,
}

// ============================================================================
// TRACKED DETECTION
// ============================================================================

/// Tick-scoped record of one recognized observation.
///
/// The id is derived from the observation's position in the batch plus its
/// raw label (`det_<index>_<label>`), not from object continuity: identities
/// are recomputed every tick, never tracked across ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDetection {
    pub id: String,
    pub bbox: BoundingBox,
    pub detected_class: String,
    pub class_confidence: f32,
    /// Winning equipment identity (highest posterior)
    pub equipment: String,
    pub equipment_confidence: f32,
    /// Full ranked posterior distribution for this observation
    pub beliefs: Vec<RankedBelief>,
}

/// Payload handed to the overlay sink when a detection appears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayDetection {
    pub bbox: BoundingBox,
    pub identity: String,
    pub score: f32,
}

// ============================================================================
// SESSION STATE & CONFIG
// ============================================================================

/// Session lifecycle: Idle -> Running -> Idle. No paused state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Running,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Runtime-adjustable session settings. Changes take effect on the next
/// tick, never retroactively.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Detection tick cadence
    pub interval: Duration,
    /// Observations below this confidence are discarded
    pub detection_threshold: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_DETECTION_INTERVAL_MS),
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
        }
    }
}
