//! Recognizer Module - Bayesian belief fusion
//!
//! Combines a noisy classifier label with domain priors about which
//! equipment is plausible in a laboratory:
//! - `similarity` - semantic closeness between a raw label and an identity
//! - `belief` - priors/likelihoods/posteriors and the Bayes update
//! - `history` - bounded temporal ledger of winning identities

pub mod belief;
pub mod history;
pub mod similarity;
pub mod types;

pub use belief::BeliefEngine;
pub use history::HistoryLedger;
pub use types::{DetectionStatistics, HistoryRecord, MostLikely, RankedBelief};
