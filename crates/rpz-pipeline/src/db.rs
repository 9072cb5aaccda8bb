//! Ordered, duplicate-free domain database.

use std::collections::HashSet;

/// An append-only membership set that remembers insertion order.
///
/// One database is owned by exactly one filtering stage for the duration of
/// a run; it grows monotonically and is never persisted.
#[derive(Debug, Default, Clone)]
pub struct DomainDb {
    order: Vec<String>,
    index: HashSet<String>,
}

impl DomainDb {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a domain, returning `false` if it was already present.
    pub fn insert(&mut self, domain: &str) -> bool {
        if self.index.insert(domain.to_string()) {
            self.order.push(domain.to_string());
            true
        } else {
            false
        }
    }

    /// Exact membership test.
    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        self.index.contains(domain)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no entry has been accepted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let mut db = DomainDb::new();
        assert!(db.insert("b.example"));
        assert!(db.insert("a.example"));
        assert!(db.insert("c.example"));
        let entries: Vec<_> = db.iter().collect();
        assert_eq!(entries, ["b.example", "a.example", "c.example"]);
    }

    #[test]
    fn rejects_duplicates() {
        let mut db = DomainDb::new();
        assert!(db.insert("a.example"));
        assert!(!db.insert("a.example"));
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn membership_is_exact() {
        let mut db = DomainDb::new();
        db.insert("ads.example.com");
        assert!(db.contains("ads.example.com"));
        assert!(!db.contains("example.com"));
        assert!(!db.contains("tracker.ads.example.com"));
    }
}
