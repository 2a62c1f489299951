//! Keyword-rule tagging and the heuristic interest score.
//!
//! Both functions are pure: tagging is a set union over static
//! category rules, scoring a weighted sum of keyword hits. The oracle
//! score (src/oracle.rs) is a separate, external signal.

use crate::config::InterestScoringConfig;

/// Label applied when no rule category matches
pub const DEFAULT_TAG: &str = "General";

/// Static category -> keyword-phrase rules. A category applies when any
/// of its phrases occurs as a literal substring of the lower-cased text.
const TAG_RULES: &[(&str, &[&str])] = &[
    ("manipulation", &["manipulation", "grasping", "picking", "dexterous"]),
    ("sim2real", &["sim2real", "simulation", "transfer"]),
    ("locomotion", &["locomotion", "walking", "legged", "quadruped"]),
    ("navigation", &["navigation", "slam", "path planning"]),
    ("perception", &["vision", "camera", "depth", "tactile", "sensor"]),
    (
        "LLM/VLA",
        &[
            "language model",
            "llm",
            "vla",
            "transformer",
            "diffusion",
            "foundation model",
        ],
    ),
    ("humanoid", &["humanoid", "bipedal"]),
    ("reinforcement", &["reinforcement learning", "policy"]),
];

/// Derive topical tags from free text. Deterministic; returns the sorted
/// set of matching categories, or `[DEFAULT_TAG]` when nothing matches.
pub fn tags(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut out: Vec<String> = TAG_RULES
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(tag, _)| tag.to_string())
        .collect();

    if out.is_empty() {
        out.push(DEFAULT_TAG.to_string());
    }
    out.sort();
    out
}

/// Heuristic relevance score: +3 per high-priority keyword present in the
/// lower-cased text, +1 per medium-priority keyword. Source adapters add
/// their own fixed bonuses (stars thresholds, official-org provenance) on
/// top of this.
pub fn interest_score(text: &str, rules: &InterestScoringConfig) -> i64 {
    let lower = text.to_lowercase();
    let mut score = 0;

    for kw in &rules.high {
        if lower.contains(&kw.to_lowercase()) {
            score += 3;
        }
    }
    for kw in &rules.medium {
        if lower.contains(&kw.to_lowercase()) {
            score += 1;
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> InterestScoringConfig {
        InterestScoringConfig {
            high: vec!["dexterous".to_string(), "vla".to_string()],
            medium: vec!["manipulation".to_string()],
        }
    }

    #[test]
    fn test_tags_deterministic() {
        let text = "Dexterous Grasping with Diffusion Policy";
        let first = tags(text);
        assert!(first.contains(&"manipulation".to_string()));
        assert!(first.contains(&"LLM/VLA".to_string()));
        assert!(!first.contains(&"locomotion".to_string()));
        assert_eq!(first, tags(text));
    }

    #[test]
    fn test_default_tag_on_no_match() {
        assert_eq!(tags("an unrelated paper about number theory"), vec![DEFAULT_TAG]);
        assert_eq!(tags(""), vec![DEFAULT_TAG]);
    }

    #[test]
    fn test_tags_case_insensitive() {
        assert!(tags("HUMANOID Robots").contains(&"humanoid".to_string()));
    }

    #[test]
    fn test_score_weights() {
        let rules = rules();
        assert_eq!(interest_score("nothing relevant", &rules), 0);
        assert_eq!(interest_score("in-hand manipulation", &rules), 1);
        assert_eq!(interest_score("dexterous manipulation", &rules), 4);
    }

    #[test]
    fn test_score_monotone_in_high_keywords() {
        let rules = rules();
        let base = interest_score("a manipulation survey", &rules);
        let more = interest_score("a manipulation survey with vla", &rules);
        assert_eq!(more, base + 3);
    }
}
