use super::verb::VerbRules;
use std::collections::BTreeSet;

/// Score how well a discovered handler name matches an expected operation
/// name.
///
/// A verb match is required: `createOrder` never matches `deleteOrder`
/// however similar the spellings are. Among candidates with the right verb,
/// Jaccard similarity over lowercase character sets breaks ties. Returns
/// `None` when the verbs disagree, otherwise a score in `0.0..=1.0`.
pub fn handler_match_score(rules: &VerbRules, expected: &str, candidate: &str) -> Option<f64> {
    let expected_verb = rules.classify(expected, None, false);
    let candidate_verb = rules.classify(candidate, None, false);
    if expected_verb != candidate_verb {
        return None;
    }
    Some(jaccard(expected, candidate))
}

/// Pick the best-scoring candidate for `expected`, if any candidate shares
/// its verb.
pub fn best_match<'a, I>(rules: &VerbRules, expected: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<(&'a str, f64)> = None;
    for candidate in candidates {
        if let Some(score) = handler_match_score(rules, expected, candidate) {
            let better = match best {
                Some((_, existing)) => score > existing,
                None => true,
            };
            if better {
                best = Some((candidate, score));
            }
        }
    }
    best.map(|(name, _)| name)
}

fn jaccard(a: &str, b: &str) -> f64 {
    let sa: BTreeSet<char> = a.to_lowercase().chars().filter(|c| c.is_alphanumeric()).collect();
    let sb: BTreeSet<char> = b.to_lowercase().chars().filter(|c| c.is_alphanumeric()).collect();
    if sa.is_empty() && sb.is_empty() {
        return 1.0;
    }
    let intersection = sa.intersection(&sb).count() as f64;
    let union = sa.union(&sb).count() as f64;
    intersection / union
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verb_mismatch_is_disqualifying() {
        let rules = VerbRules::standard();
        assert!(handler_match_score(&rules, "createOrder", "deleteOrder").is_none());
    }

    #[test]
    fn test_identical_names_score_one() {
        let rules = VerbRules::standard();
        assert_eq!(
            handler_match_score(&rules, "getOrder", "getOrder"),
            Some(1.0)
        );
    }

    #[test]
    fn test_best_match_prefers_closest_spelling() {
        let rules = VerbRules::standard();
        let candidates = ["getOrderBook", "getOrder", "listOrders"];
        assert_eq!(
            best_match(&rules, "getOrder", candidates),
            Some("getOrder")
        );
    }

    #[test]
    fn test_best_match_none_when_no_verb_agrees() {
        let rules = VerbRules::standard();
        assert_eq!(best_match(&rules, "deleteOrder", ["getOrder", "listOrders"]), None);
    }
}
