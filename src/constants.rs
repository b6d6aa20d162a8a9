//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.
//! To change detection cadence or thresholds, only edit this file.

/// Default detection tick interval (milliseconds)
pub const DEFAULT_DETECTION_INTERVAL_MS: u64 = 500;

/// Default minimum confidence for an observation to enter the pipeline
pub const DEFAULT_DETECTION_THRESHOLD: f32 = 0.5;

/// Maximum records kept in the detection history ledger (FIFO)
pub const MAX_HISTORY_SIZE: usize = 50;

/// Floor substituted for a zero marginal P(detection) to avoid division by zero
pub const MARGINAL_FLOOR: f32 = 1e-4;

/// Prior used for an identity missing from the prior map
pub const FALLBACK_PRIOR: f32 = 0.1;

/// Initial P(Detection | Equipment) assigned to every catalog identity
/// when a session is created, before any observation refreshes it
pub const INITIAL_LIKELIHOOD: f32 = 0.8;

// ============================================
// Similarity tiers (see logic/recognizer/similarity.rs)
// ============================================

/// Exact case-insensitive label match
pub const SIMILARITY_EXACT: f32 = 1.0;

/// One label is a substring of the other
pub const SIMILARITY_SUBSTRING: f32 = 0.8;

/// Detected label contains an associated keyword for the identity
pub const SIMILARITY_KEYWORD: f32 = 0.6;

/// Unrelated labels. Never zero, so posteriors cannot collapse to exactly 0.
pub const SIMILARITY_DEFAULT: f32 = 0.1;

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "AR-Lab-Core";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get detection interval from environment or use default
pub fn get_detection_interval_ms() -> u64 {
    std::env::var("ARLAB_DETECTION_INTERVAL_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_DETECTION_INTERVAL_MS)
}

/// Get detection threshold from environment or use default
pub fn get_detection_threshold() -> f32 {
    std::env::var("ARLAB_DETECTION_THRESHOLD")
        .ok()
        .and_then(|s| s.parse().ok())
        .filter(|t| (0.0..=1.0).contains(t))
        .unwrap_or(DEFAULT_DETECTION_THRESHOLD)
}
