//! Belief Engine - Bayesian update over equipment identities
//!
//! Owns the prior/likelihood/posterior maps and computes
//! P(Equipment | Detection) = P(Detection | Equipment) * P(Equipment) / P(Detection).
//!
//! The maps are heuristic working state, not a normalized distribution:
//! entries for identities untouched by the current tick keep their previous
//! values. This cross-tick staleness is intentional and frozen by a
//! regression test below. Invalid probability inputs are silently rejected
//! so the detection loop can never be crashed by a bad setter call.

use std::collections::HashMap;

use crate::constants::{FALLBACK_PRIOR, MARGINAL_FLOOR};
use super::similarity::similarity;
use super::types::RankedBelief;

// ============================================================================
// ENGINE
// ============================================================================

#[derive(Debug, Default)]
pub struct BeliefEngine {
    /// P(Equipment)
    priors: HashMap<String, f32>,
    /// P(Detection | Equipment), overwritten per evaluated identity
    likelihoods: HashMap<String, f32>,
    /// Last computed P(Equipment | Detection)
    posteriors: HashMap<String, f32>,
}

impl BeliefEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prior probability for one identity. Values outside [0, 1]
    /// are rejected without touching state.
    pub fn set_prior(&mut self, identity: &str, probability: f32) {
        if (0.0..=1.0).contains(&probability) {
            self.priors.insert(identity.to_string(), probability);
        } else {
            log::debug!(
                "Rejected prior {} for '{}' (outside [0,1])",
                probability,
                identity
            );
        }
    }

    /// Equal prior probability for every identity in the list.
    pub fn initialize_uniform_priors(&mut self, identities: &[String]) {
        if identities.is_empty() {
            return;
        }
        let probability = 1.0 / identities.len() as f32;
        for identity in identities {
            self.priors.insert(identity.clone(), probability);
        }
        log::info!(
            "Initialized uniform priors: {} identities at {:.4}",
            identities.len(),
            probability
        );
    }

    /// Set P(Detection | Equipment) for one identity. Same validity rule
    /// as `set_prior`.
    pub fn set_likelihood(&mut self, identity: &str, likelihood: f32) {
        if (0.0..=1.0).contains(&likelihood) {
            self.likelihoods.insert(identity.to_string(), likelihood);
        } else {
            log::debug!(
                "Rejected likelihood {} for '{}' (outside [0,1])",
                likelihood,
                identity
            );
        }
    }

    /// Bayes' rule for one identity. The marginal P(Detection) is recomputed
    /// by summing over every identity currently present in the prior map;
    /// identities without an explicit likelihood fall back to the observed
    /// confidence. A zero marginal is floored to avoid division by zero.
    ///
    /// Side effect: stores the result in the posterior map.
    pub fn calculate_posterior(&mut self, identity: &str, detection_confidence: f32) -> f32 {
        let prior = self.priors.get(identity).copied().unwrap_or(FALLBACK_PRIOR);
        let likelihood = self
            .likelihoods
            .get(identity)
            .copied()
            .unwrap_or(detection_confidence);

        let mut total_probability = 0.0f32;
        for (eq, p) in &self.priors {
            let l = self
                .likelihoods
                .get(eq)
                .copied()
                .unwrap_or(detection_confidence);
            total_probability += l * p;
        }

        if total_probability == 0.0 {
            total_probability = MARGINAL_FLOOR;
        }

        let posterior = (likelihood * prior) / total_probability;
        self.posteriors.insert(identity.to_string(), posterior);
        posterior
    }

    /// Single public entry point for the detection session: refresh the
    /// likelihood of every candidate from the similarity heuristic, compute
    /// posteriors, and return candidates ranked by descending posterior.
    ///
    /// Ties keep the candidate-list order (stable sort), so the caller's
    /// catalog order decides between equally-likely identities.
    pub fn update_belief(
        &mut self,
        detected_class: &str,
        confidence: f32,
        candidates: &[String],
    ) -> Vec<RankedBelief> {
        let mut result: Vec<RankedBelief> = candidates
            .iter()
            .map(|identity| {
                let sim = similarity(detected_class, identity);
                self.set_likelihood(identity, sim * confidence);
                let posterior = self.calculate_posterior(identity, confidence);
                RankedBelief {
                    identity: identity.clone(),
                    posterior,
                }
            })
            .collect();

        result.sort_by(|a, b| {
            b.posterior
                .partial_cmp(&a.posterior)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        result
    }

    /// Snapshot of the posterior map.
    pub fn posteriors(&self) -> HashMap<String, f32> {
        self.posteriors.clone()
    }

    pub fn prior(&self, identity: &str) -> Option<f32> {
        self.priors.get(identity).copied()
    }

    pub fn likelihood(&self, identity: &str) -> Option<f32> {
        self.likelihoods.get(identity).copied()
    }

    pub fn posterior(&self, identity: &str) -> Option<f32> {
        self.posteriors.get(identity).copied()
    }

    /// Drop stored posteriors; priors and likelihoods are untouched.
    pub fn clear_posteriors(&mut self) {
        self.posteriors.clear();
    }

    /// Reset all three maps.
    pub fn reset(&mut self) {
        self.priors.clear();
        self.likelihoods.clear();
        self.posteriors.clear();
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn identities(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_uniform_priors() {
        let mut engine = BeliefEngine::new();
        let ids = identities(&["beaker", "flask", "microscope", "pipette"]);
        engine.initialize_uniform_priors(&ids);

        for id in &ids {
            assert_eq!(engine.prior(id), Some(0.25));
        }
    }

    #[test]
    fn test_uniform_priors_empty_list_is_noop() {
        let mut engine = BeliefEngine::new();
        engine.initialize_uniform_priors(&[]);
        assert_eq!(engine.prior("beaker"), None);
    }

    #[test]
    fn test_invalid_setter_values_rejected() {
        let mut engine = BeliefEngine::new();
        engine.set_prior("beaker", 0.5);

        engine.set_prior("beaker", 1.5);
        engine.set_prior("beaker", -0.1);
        engine.set_likelihood("beaker", 2.0);
        engine.set_likelihood("beaker", f32::NAN);

        assert_eq!(engine.prior("beaker"), Some(0.5));
        assert_eq!(engine.likelihood("beaker"), None);
    }

    #[test]
    fn test_posterior_in_unit_interval() {
        let mut engine = BeliefEngine::new();
        let ids = identities(&["beaker", "flask", "microscope"]);
        engine.initialize_uniform_priors(&ids);
        engine.set_likelihood("beaker", 0.9);
        engine.set_likelihood("flask", 0.2);

        for id in &ids {
            let p = engine.calculate_posterior(id, 0.6);
            assert!((0.0..=1.0).contains(&p), "posterior {} out of range", p);
            assert_eq!(engine.posterior(id), Some(p));
        }
    }

    #[test]
    fn test_zero_marginal_uses_floor() {
        let mut engine = BeliefEngine::new();
        engine.set_prior("beaker", 0.0);
        engine.set_likelihood("beaker", 0.0);

        let p = engine.calculate_posterior("beaker", 0.0);
        assert!(p.is_finite());
        assert_eq!(p, 0.0);
    }

    #[test]
    fn test_update_belief_ranks_exact_match_highest() {
        let mut engine = BeliefEngine::new();
        let ids = identities(&["beaker", "flask", "microscope"]);
        engine.initialize_uniform_priors(&ids);

        let ranked = engine.update_belief("beaker", 0.9, &ids);

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].identity, "beaker");
        // Strictly highest: exact match at 1.0 similarity dominates
        assert!(ranked[0].posterior > ranked[1].posterior);
        for pair in ranked.windows(2) {
            assert!(pair[0].posterior >= pair[1].posterior);
        }
    }

    #[test]
    fn test_keyword_association_beats_default_tier() {
        // "cup" associates with "beaker" (0.6) but not "flask" (0.1)
        let mut engine = BeliefEngine::new();
        let ids = identities(&["beaker", "flask"]);
        engine.initialize_uniform_priors(&ids);

        let ranked = engine.update_belief("cup", 0.6, &ids);

        assert_eq!(ranked[0].identity, "beaker");
        assert!(ranked[0].posterior > ranked[1].posterior);
    }

    #[test]
    fn test_tie_keeps_candidate_order() {
        // Once likelihoods have converged (second identical update), equal
        // similarity tiers with equal priors yield exactly tied posteriors;
        // the stable sort must keep candidate-list order.
        let mut engine = BeliefEngine::new();
        let ids = identities(&["flask", "microscope"]);
        engine.initialize_uniform_priors(&ids);

        engine.update_belief("laptop", 0.7, &ids);
        let ranked = engine.update_belief("laptop", 0.7, &ids);

        assert_eq!(ranked[0].posterior, ranked[1].posterior);
        assert_eq!(ranked[0].identity, "flask");
        assert_eq!(ranked[1].identity, "microscope");
    }

    #[test]
    fn test_marginal_is_recomputed_per_candidate() {
        // Frozen heuristic: the marginal is re-summed for each candidate in
        // sequence, after that candidate's likelihood has been overwritten.
        // With equal similarity tiers the later candidate therefore sees a
        // smaller marginal and scores strictly higher on the first pass.
        let mut engine = BeliefEngine::new();
        let ids = identities(&["beaker", "test tube"]);
        engine.initialize_uniform_priors(&ids);
        engine.set_likelihood("beaker", 0.8);
        engine.set_likelihood("test tube", 0.8);

        // "cup" hits the keyword tier (0.6) for both identities
        let ranked = engine.update_belief("cup", 0.6, &ids);

        assert_eq!(ranked[0].identity, "test tube");
        assert!(ranked[0].posterior > ranked[1].posterior);
    }

    #[test]
    fn test_stale_entries_survive_partial_update() {
        // Regression freeze: updating beliefs over a subset of identities
        // must leave the other identities' likelihoods/posteriors untouched.
        let mut engine = BeliefEngine::new();
        let all = identities(&["beaker", "flask"]);
        engine.initialize_uniform_priors(&all);

        engine.update_belief("beaker", 0.9, &all);
        let stale_likelihood = engine.likelihood("flask").unwrap();
        let stale_posterior = engine.posterior("flask").unwrap();

        engine.update_belief("beaker", 0.4, &identities(&["beaker"]));

        assert_eq!(engine.likelihood("flask"), Some(stale_likelihood));
        assert_eq!(engine.posterior("flask"), Some(stale_posterior));
    }

    #[test]
    fn test_unset_likelihood_falls_back_to_confidence() {
        let mut engine = BeliefEngine::new();
        engine.set_prior("beaker", 0.5);
        engine.set_prior("flask", 0.5);
        engine.set_likelihood("beaker", 0.8);
        // flask has no likelihood: marginal = 0.8*0.5 + confidence*0.5

        let p = engine.calculate_posterior("beaker", 0.4);
        let expected = (0.8 * 0.5) / (0.8 * 0.5 + 0.4 * 0.5);
        assert!((p - expected).abs() < 1e-6);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut engine = BeliefEngine::new();
        let ids = identities(&["beaker"]);
        engine.initialize_uniform_priors(&ids);
        engine.update_belief("beaker", 0.9, &ids);

        engine.reset();

        assert_eq!(engine.prior("beaker"), None);
        assert_eq!(engine.likelihood("beaker"), None);
        assert!(engine.posteriors().is_empty());
    }
}
