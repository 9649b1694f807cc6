//! Helpers for MRS variable names such as `x3` or `h0`.

/// Sort of handle variables.
pub const HANDLE: &str = "h";

/// Split a variable into its sort and numeric id, e.g. `x12` → `("x", "12")`.
pub fn split(var: &str) -> (&str, &str) {
    let idx = var
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(var.len());
    var.split_at(idx)
}

/// The sort (type) of a variable: `e`, `x`, `h`, `i`, `u`, ...
pub fn sort(var: &str) -> &str {
    split(var).0
}

pub fn is_handle(var: &str) -> bool {
    sort(var) == HANDLE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_sort_and_id() {
        assert_eq!(split("x12"), ("x", "12"));
        assert_eq!(split("h0"), ("h", "0"));
        assert_eq!(split("u"), ("u", ""));
    }

    #[test]
    fn test_recognises_handles() {
        assert!(is_handle("h7"));
        assert!(!is_handle("e2"));
    }
}
