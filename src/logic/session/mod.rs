//! Session Module - detection loop and collaborator boundary
//!
//! - `collaborators` - traits for the camera, detector, and output sinks
//! - `engine` - the per-tick control loop and overlay diffing
//! - `types` - observations, tracked detections, session config/state

pub mod collaborators;
pub mod engine;
pub mod types;

pub use collaborators::{Camera, Detector, DetectorError, Frame, InfoSink, OverlaySink, VoiceSink};
pub use engine::DetectionSession;
pub use types::{
    BoundingBox, Observation, OverlayDetection, SessionConfig, SessionState, TrackedDetection,
};
