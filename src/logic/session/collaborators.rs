//! Collaborator Boundary
//!
//! Traits for the external pieces the session drives: frame acquisition,
//! the object classifier, and the overlay/info/voice output sinks. All of
//! them can be mocked for testing; none of their internals are part of
//! this crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{Observation, OverlayDetection, TrackedDetection};
use crate::logic::catalog::EquipmentInfo;

// ============================================================================
// FRAME
// ============================================================================

/// Opaque handle to one captured camera frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Frame {
    pub id: u64,
    /// Capture timestamp (unix millis)
    pub timestamp_ms: i64,
}

// ============================================================================
// ERRORS
// ============================================================================

/// Failures the detector collaborator may report. The session treats any
/// of these as "no observations this tick" and keeps running.
#[derive(Debug, Clone)]
pub enum DetectorError {
    ModelNotLoaded,
    Inference(String),
    Backend(String),
}

impl std::fmt::Display for DetectorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ModelNotLoaded => write!(f, "Model not loaded"),
            Self::Inference(e) => write!(f, "Inference error: {}", e),
            Self::Backend(e) => write!(f, "Backend error: {}", e),
        }
    }
}

impl std::error::Error for DetectorError {}

// ============================================================================
// INPUT COLLABORATORS
// ============================================================================

/// Pulls frames from a camera. Assumed always available while the session
/// is running.
pub trait Camera {
    fn capture_frame(&mut self) -> Frame;
}

/// Runs the external object classifier on a frame. The call is I/O-bound
/// and may suspend.
#[async_trait]
pub trait Detector {
    async fn detect(&mut self, frame: &Frame) -> Result<Vec<Observation>, DetectorError>;
}

// ============================================================================
// OUTPUT COLLABORATORS
// ============================================================================

/// Visual overlay keyed by detection id.
pub trait OverlaySink {
    fn add_detection(&self, id: &str, overlay: OverlayDetection);
    fn remove_detection(&self, id: &str);
    fn clear_all(&self);
    /// Enable or disable the overlay animation loop.
    fn set_animating(&self, animating: bool);
}

/// Receives the single top-ranked detection for rendering equipment
/// name, description, and safety text.
pub trait InfoSink {
    fn show_equipment(&self, detection: &TrackedDetection, info: &EquipmentInfo);
    fn clear(&self);
}

/// Receives plain-text announcements. Fire-and-forget: implementations
/// queue internally, the session loop never waits on speech.
pub trait VoiceSink {
    fn announce(&self, text: &str);
}
