//! Word-set similarity used for memory recall.
//!
//! Recall is a full scan scored by Jaccard similarity over case-normalized
//! word sets. This is O(N) per query on purpose: the store is sized for
//! tens of thousands of records, not a search index.

use std::collections::HashSet;

/// Tokenize text into a lowercase alphanumeric word set.
///
/// Any non-alphanumeric character is a separator, so "drone-route" and
/// "drone route" produce the same set.
pub fn word_set(text: &str) -> HashSet<String> {
    let cleaned: String = text
        .chars()
        .map(|ch| if ch.is_alphanumeric() { ch.to_ascii_lowercase() } else { ' ' })
        .collect();
    cleaned.split_whitespace().map(ToString::to_string).collect()
}

/// Jaccard similarity `|A ∩ B| / |A ∪ B|`. Returns 0.0 when either set is
/// empty.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union as f64
}

/// Convenience wrapper scoring two raw strings.
pub fn similarity(query: &str, action: &str) -> f64 {
    jaccard(&word_set(query), &word_set(action))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_text_scores_one() {
        assert!((similarity("optimize drone route", "optimize drone route") - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_text_scores_zero() {
        assert!(similarity("alpha beta", "gamma delta").abs() < f64::EPSILON);
    }

    #[test]
    fn empty_query_scores_zero() {
        assert!(similarity("", "optimize drone route").abs() < f64::EPSILON);
    }

    #[test]
    fn tokenization_is_case_and_punctuation_insensitive() {
        let a = word_set("Fix Revenue-Drop, EU!");
        let b = word_set("fix revenue drop eu");
        assert_eq!(a, b);
    }

    #[test]
    fn partial_overlap_scores_between_zero_and_one() {
        // {optimize, drone, route} vs {optimize, delivery, route}: 2/4
        let score = similarity("optimize drone route", "optimize delivery route");
        assert!((score - 0.5).abs() < f64::EPSILON);
    }
}
