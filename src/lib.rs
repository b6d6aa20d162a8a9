//! AR Lab Equipment Identifier - Core Service
//!
//! Belief-fusion and detection-session engine: turns noisy object-classifier
//! output into a ranked posterior over known lab equipment, tracks that belief
//! over time, and reconciles it with on-screen overlay markers.
//!
//! ## Architecture
//! - `logic/recognizer/` - Bayesian recognizer (similarity, belief, history)
//! - `logic/session/` - Detection session loop and collaborator boundary
//! - `logic/catalog.rs` - Static equipment reference catalog

pub mod constants;
pub mod logic;

pub use logic::catalog::{EquipmentCatalog, EquipmentInfo};
pub use logic::recognizer::belief::BeliefEngine;
pub use logic::recognizer::history::HistoryLedger;
pub use logic::session::engine::DetectionSession;
pub use logic::session::types::{Observation, SessionConfig, SessionState, TrackedDetection};
