//! Canonical domain-name helpers.
//!
//! A canonical domain is a non-empty, dot-separated label sequence with no
//! trailing dot and no `*.` wildcard marker. Case is preserved as extracted.

/// Returns true if `candidate` satisfies the canonical domain invariants:
/// non-empty, no whitespace, no trailing dot, no leading `*.`.
#[must_use]
pub fn is_canonical_domain(candidate: &str) -> bool {
    !candidate.is_empty()
        && !candidate.ends_with('.')
        && !candidate.starts_with("*.")
        && !candidate.contains(char::is_whitespace)
}

/// Number of dot-separated labels in a domain.
#[must_use]
pub fn label_count(domain: &str) -> usize {
    domain.split('.').count()
}
