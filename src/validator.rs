use crate::adapter;
use similar::TextDiff;

/// Pairs closer than this are "small injected defects"; anything below got
/// mangled too badly to train on.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Character-level similarity ratio in [0, 1], difflib-equivalent
/// (2 * matches / total length).
pub fn similarity(a: &str, b: &str) -> f64 {
    TextDiff::from_chars(a, b).ratio() as f64
}

/// Acceptability check for a guaranteed-invalid mutant pair: the mutated
/// side must NOT parse, the original must, and the pair must stay similar
/// enough to represent a small defect.
pub fn is_acceptable(mutated: &str, original: &str) -> bool {
    if adapter::parses(mutated) {
        return false;
    }
    if !adapter::parses(original) {
        return false;
    }
    similarity(mutated, original) > SIMILARITY_THRESHOLD
}

/// Filter `(mutated, original)` pairs independently, preserving order.
pub fn batch_validate(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    pairs
        .into_iter()
        .filter(|(mutated, original)| is_acceptable(mutated, original))
        .collect()
}
