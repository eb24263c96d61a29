//! Property tests for the recall similarity scoring.

use hivemind::domain::similarity::{jaccard, similarity, word_set};
use proptest::prelude::*;

proptest! {
    #[test]
    fn similarity_is_bounded(a in ".{0,200}", b in ".{0,200}") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn similarity_is_symmetric(a in ".{0,200}", b in ".{0,200}") {
        prop_assert!((similarity(&a, &b) - similarity(&b, &a)).abs() < f64::EPSILON);
    }

    #[test]
    fn self_similarity_is_maximal(a in "[a-z ]{1,100}") {
        let words = word_set(&a);
        if words.is_empty() {
            prop_assert!(similarity(&a, &a).abs() < f64::EPSILON);
        } else {
            prop_assert!((similarity(&a, &a) - 1.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn case_never_changes_the_score(a in "[a-zA-Z ]{0,100}", b in "[a-zA-Z ]{0,100}") {
        let upper = similarity(&a.to_uppercase(), &b.to_uppercase());
        let lower = similarity(&a.to_lowercase(), &b.to_lowercase());
        prop_assert!((upper - lower).abs() < f64::EPSILON);
    }

    #[test]
    fn jaccard_of_disjoint_sets_is_zero(
        a in prop::collection::hash_set("[a-m]{1,4}", 0..10),
        b in prop::collection::hash_set("[n-z]{1,4}", 0..10),
    ) {
        prop_assert!(jaccard(&a, &b).abs() < f64::EPSILON);
    }
}
