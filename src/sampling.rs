/// Weighted categorical draw over a slice of rates. Returns the chosen index,
/// or `None` for an empty slice. Entries with non-positive weight are never
/// chosen unless every entry is non-positive, in which case the draw is
/// uniform.
pub fn weighted_index(rng: &mut fastrand::Rng, weights: &[f64]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return Some(rng.usize(..weights.len()));
    }
    let mut x = rng.f64() * total;
    let mut last = None;
    for (i, w) in weights.iter().enumerate() {
        if *w <= 0.0 {
            continue;
        }
        if x < *w {
            return Some(i);
        }
        x -= w;
        last = Some(i);
    }
    // Floating-point drift can exhaust the loop; fall back to the final
    // positive-weight entry.
    last
}
