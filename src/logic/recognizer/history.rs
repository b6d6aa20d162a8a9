//! History Ledger - bounded temporal log of winning identities
//!
//! FIFO queue with fixed capacity; derives an aggregate "most likely over
//! time" verdict weighted by how often an identity won and how confidently.

use std::collections::VecDeque;

use chrono::Utc;

use crate::constants::MAX_HISTORY_SIZE;
use super::types::{HistoryRecord, MostLikely};

// ============================================================================
// LEDGER
// ============================================================================

#[derive(Debug)]
pub struct HistoryLedger {
    records: VecDeque<HistoryRecord>,
    capacity: usize,
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new(MAX_HISTORY_SIZE)
    }
}

impl HistoryLedger {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a record with the current timestamp, evicting the oldest
    /// record once capacity is exceeded.
    pub fn add(&mut self, identity: &str, weighted_confidence: f32) {
        self.records.push_back(HistoryRecord {
            identity: identity.to_string(),
            confidence: weighted_confidence,
            timestamp: Utc::now(),
        });

        while self.records.len() > self.capacity {
            self.records.pop_front();
        }
    }

    /// Identity with the highest `count * average(confidence)` score.
    ///
    /// Records are scanned front to back, so on a tied score the identity
    /// seen earliest in the ledger keeps priority.
    pub fn most_likely(&self) -> MostLikely {
        // (identity, count, confidence sum), in first-seen order
        let mut groups: Vec<(&str, usize, f32)> = Vec::new();

        for record in &self.records {
            match groups.iter_mut().find(|(id, _, _)| *id == record.identity) {
                Some((_, count, sum)) => {
                    *count += 1;
                    *sum += record.confidence;
                }
                None => groups.push((&record.identity, 1, record.confidence)),
            }
        }

        let mut best: Option<&str> = None;
        let mut best_score = 0.0f32;

        for (identity, count, sum) in &groups {
            let avg_confidence = sum / *count as f32;
            let score = *count as f32 * avg_confidence;
            if score > best_score {
                best_score = score;
                best = Some(identity);
            }
        }

        MostLikely {
            identity: best.map(|s| s.to_string()),
            score: best_score,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of distinct identities currently in the ledger.
    pub fn unique_identities(&self) -> usize {
        let mut seen: Vec<&str> = Vec::new();
        for record in &self.records {
            if !seen.contains(&record.identity.as_str()) {
                seen.push(&record.identity);
            }
        }
        seen.len()
    }

    /// Records oldest-first.
    pub fn records(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    /// Empty the ledger. Belief engine state is not touched here.
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_bound_and_fifo_eviction() {
        let mut ledger = HistoryLedger::default();

        for i in 0..51 {
            ledger.add(&format!("eq_{}", i), 0.5);
        }

        assert_eq!(ledger.len(), 50);
        // Oldest evicted, newest 50 remain in original relative order
        let ids: Vec<String> = ledger.records().map(|r| r.identity.clone()).collect();
        assert_eq!(ids[0], "eq_1");
        assert_eq!(ids[49], "eq_50");
        assert!(!ids.contains(&"eq_0".to_string()));
    }

    #[test]
    fn test_most_likely_weighted_by_count_and_confidence() {
        let mut ledger = HistoryLedger::default();
        // beaker: 3 * avg(0.6) = 1.8, flask: 1 * 0.9 = 0.9
        ledger.add("beaker", 0.6);
        ledger.add("flask", 0.9);
        ledger.add("beaker", 0.6);
        ledger.add("beaker", 0.6);

        let verdict = ledger.most_likely();
        assert_eq!(verdict.identity.as_deref(), Some("beaker"));
        assert!((verdict.score - 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_most_likely_tie_keeps_first_seen() {
        let mut ledger = HistoryLedger::default();
        ledger.add("flask", 0.8);
        ledger.add("beaker", 0.8);

        let verdict = ledger.most_likely();
        assert_eq!(verdict.identity.as_deref(), Some("flask"));
    }

    #[test]
    fn test_most_likely_on_empty_ledger() {
        let ledger = HistoryLedger::default();
        let verdict = ledger.most_likely();
        assert_eq!(verdict.identity, None);
        assert_eq!(verdict.score, 0.0);
    }

    #[test]
    fn test_unique_identity_count() {
        let mut ledger = HistoryLedger::default();
        ledger.add("beaker", 0.5);
        ledger.add("flask", 0.5);
        ledger.add("beaker", 0.5);

        assert_eq!(ledger.unique_identities(), 2);
    }

    #[test]
    fn test_clear_empties_records() {
        let mut ledger = HistoryLedger::default();
        ledger.add("beaker", 0.5);
        ledger.clear();

        assert!(ledger.is_empty());
        assert_eq!(ledger.most_likely().identity, None);
    }
}
