//! Predicate symbol normalization.

/// Normalize a predicate to its short form.
///
/// Quotes are dropped, the symbol is lower-cased and a trailing `_rel` is
/// removed, so `"_bark_v_1_rel"` and `_bark_v_1` compare equal.
pub fn normalize(pred: &str) -> String {
    let trimmed = pred.trim().trim_matches('"').trim_start_matches('\'');
    let lowered = trimmed.to_lowercase();
    match lowered.strip_suffix("_rel") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => lowered,
    }
}

/// Surface predicates start with an underscore; everything else is abstract.
pub fn is_surface(pred: &str) -> bool {
    pred.starts_with('_')
}
