//! Test catalog model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The reusable price list of diagnostic tests, keyed by unique name.
///
/// Serializes as a plain name-to-price JSON object, the on-disk shape of
/// `tests.json`. Prices here are only defaults; each patient record snapshots
/// the cost at selection time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TestCatalog {
    entries: BTreeMap<String, f64>,
}

impl TestCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Default price for a test, if present.
    pub fn price_of(&self, name: &str) -> Option<f64> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, name: String, price: f64) {
        self.entries.insert(name, price);
    }

    /// Remove an entry, returning its price if it existed.
    pub fn remove(&mut self, name: &str) -> Option<f64> {
        self.entries.remove(name)
    }

    /// Iterate entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(name, price)| (name.as_str(), *price))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_lookup() {
        let mut catalog = TestCatalog::new();
        catalog.insert("CBC".into(), 200.0);
        assert_eq!(catalog.price_of("CBC"), Some(200.0));
        assert!(catalog.contains("CBC"));
        assert!(!catalog.contains("X-Ray"));
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut catalog = TestCatalog::new();
        catalog.insert("CBC".into(), 200.0);
        let json = serde_json::to_string(&catalog).unwrap();
        assert_eq!(json, r#"{"CBC":200.0}"#);
    }

    #[test]
    fn test_iter_is_name_ordered() {
        let mut catalog = TestCatalog::new();
        catalog.insert("X-Ray".into(), 500.0);
        catalog.insert("CBC".into(), 200.0);
        let names: Vec<_> = catalog.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(names, vec!["CBC", "X-Ray"]);
    }
}
