//! Recognizer Types
//!
//! Data structures only - no logic.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// RANKED BELIEF
// ============================================================================

/// One identity with its posterior probability, as produced by a belief update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedBelief {
    pub identity: String,
    pub posterior: f32,
}

// ============================================================================
// HISTORY RECORD
// ============================================================================

/// One winning identity per tick, with its weighted confidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub identity: String,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate "most likely over time" verdict derived from the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MostLikely {
    /// None when the ledger is empty
    pub identity: Option<String>,
    /// count(identity) * average(confidence)
    pub score: f32,
}

// ============================================================================
// STATISTICS SNAPSHOT
// ============================================================================

/// Read-only snapshot combining ledger state and the engine's posteriors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionStatistics {
    pub total_detections: usize,
    pub unique_equipment: usize,
    pub most_likely: MostLikely,
    pub posteriors: HashMap<String, f32>,
}
