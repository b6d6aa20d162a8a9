//! Semantic Similarity Scoring
//!
//! Maps a raw classifier label to a closeness score against a known
//! equipment identity. Pure and deterministic; the tie-break ladder is
//! evaluated in order and the first matching tier wins:
//!
//! 1. Exact case-insensitive match        -> 1.0
//! 2. One string contains the other      -> 0.8
//! 3. Label contains an associated keyword -> 0.6
//! 4. Otherwise                           -> 0.1

use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::constants::{
    SIMILARITY_DEFAULT, SIMILARITY_EXACT, SIMILARITY_KEYWORD, SIMILARITY_SUBSTRING,
};

/// Keyword associations per identity: generic classifier classes that
/// commonly stand in for a given piece of lab equipment.
static LAB_KEYWORDS: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    map.insert("beaker", &["cup", "bottle", "container"]);
    map.insert("flask", &["bottle", "container"]);
    map.insert("test tube", &["cup", "bottle"]);
    map.insert("pipette", &["stick", "tool"]);
    map.insert("burette", &["stick", "tool", "bottle"]);
    map.insert("microscope", &["instrument", "device"]);
    map.insert("bunsen burner", &["lamp", "light"]);
    map
});

/// Semantic similarity between a detected class label and an equipment
/// identity, in [0, 1]. Identities absent from the keyword table fall
/// through to the default tier.
pub fn similarity(detected_label: &str, identity: &str) -> f32 {
    let detected = detected_label.to_lowercase();
    let equip = identity.to_lowercase();

    if detected == equip {
        return SIMILARITY_EXACT;
    }

    if detected.contains(&equip) || equip.contains(&detected) {
        return SIMILARITY_SUBSTRING;
    }

    let keywords = LAB_KEYWORDS.get(equip.as_str()).copied().unwrap_or(&[]);
    if keywords.iter().any(|kw| detected.contains(kw)) {
        return SIMILARITY_KEYWORD;
    }

    SIMILARITY_DEFAULT
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_short_circuits() {
        // Equal strings also satisfy the substring tier; tier 1 must win.
        assert_eq!(similarity("beaker", "beaker"), SIMILARITY_EXACT);
        assert_eq!(similarity("Beaker", "bEAKER"), SIMILARITY_EXACT);
    }

    #[test]
    fn test_substring_tier_either_direction() {
        assert_eq!(similarity("cup", "beaker-cup-combo"), SIMILARITY_SUBSTRING);
        assert_eq!(similarity("beaker-cup-combo", "cup"), SIMILARITY_SUBSTRING);
        assert_eq!(similarity("glass beaker", "beaker"), SIMILARITY_SUBSTRING);
    }

    #[test]
    fn test_keyword_tier() {
        // COCO-style generic labels mapped through the association table
        assert_eq!(similarity("cup", "beaker"), SIMILARITY_KEYWORD);
        assert_eq!(similarity("bottle", "flask"), SIMILARITY_KEYWORD);
        assert_eq!(similarity("lamp", "bunsen burner"), SIMILARITY_KEYWORD);
        // Keyword containment, not equality
        assert_eq!(similarity("coffee cup", "beaker"), SIMILARITY_KEYWORD);
    }

    #[test]
    fn test_default_tier_is_nonzero() {
        let score = similarity("laptop", "flask");
        assert_eq!(score, SIMILARITY_DEFAULT);
        assert!(score > 0.0);
    }

    #[test]
    fn test_unknown_identity_has_empty_keyword_set() {
        // "centrifuge" has no keyword entry; only tiers 1/2/4 can apply
        assert_eq!(similarity("cup", "centrifuge"), SIMILARITY_DEFAULT);
        assert_eq!(similarity("centrifuge", "centrifuge"), SIMILARITY_EXACT);
    }

    #[test]
    fn test_case_insensitive_everywhere() {
        assert_eq!(similarity("CUP", "Beaker"), SIMILARITY_KEYWORD);
        assert_eq!(similarity("GLASS BEAKER", "beaker"), SIMILARITY_SUBSTRING);
    }
}
