//! Relationship records between entities.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Cardinality;

/// Entity identifier -> join column on that side.
pub type KeyMap = BTreeMap<String, String>;

/// Provenance of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeOrigin {
    /// Declared by the source (foreign key constraint or equivalent).
    Schema,
    /// Proposed by a heuristic pass.
    Inferred,
}

impl EdgeOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeOrigin::Schema => "schema",
            EdgeOrigin::Inferred => "inferred",
        }
    }
}

impl std::fmt::Display for EdgeOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Undirected relationship between two entities.
///
/// `left` and `right` only fix the orientation in which [`Edge::cardinality`]
/// is read; traversal treats the edge as undirected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    left: String,
    right: String,
    key_map: KeyMap,
    origin: EdgeOrigin,
    cardinality: Option<Cardinality>,
    rules: Vec<String>,
}

impl Edge {
    /// Create an edge with no join keys yet.
    pub fn new(left: impl Into<String>, right: impl Into<String>, origin: EdgeOrigin) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            key_map: KeyMap::new(),
            origin,
            cardinality: None,
            rules: Vec::new(),
        }
    }

    pub fn left(&self) -> &str {
        &self.left
    }

    pub fn right(&self) -> &str {
        &self.right
    }

    /// Whether `identifier` is one of the two endpoints.
    pub fn connects(&self, identifier: &str) -> bool {
        self.left == identifier || self.right == identifier
    }

    /// The endpoint opposite `identifier`.
    pub fn other(&self, identifier: &str) -> Option<&str> {
        if self.left == identifier {
            Some(&self.right)
        } else if self.right == identifier {
            Some(&self.left)
        } else {
            None
        }
    }

    pub fn key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Join column on the given side.
    pub fn key_for(&self, identifier: &str) -> Option<&str> {
        self.key_map.get(identifier).map(String::as_str)
    }

    /// Both join columns are known.
    pub fn is_resolved(&self) -> bool {
        self.key_map.contains_key(&self.left) && self.key_map.contains_key(&self.right)
    }

    pub fn origin(&self) -> EdgeOrigin {
        self.origin
    }

    pub fn is_schema(&self) -> bool {
        self.origin == EdgeOrigin::Schema
    }

    /// Cardinality read left to right, once inference has classified it.
    pub fn cardinality(&self) -> Option<Cardinality> {
        self.cardinality
    }

    /// Cardinality read starting from `identifier`'s side.
    pub fn cardinality_from(&self, identifier: &str) -> Option<Cardinality> {
        if identifier == self.left {
            self.cardinality
        } else if identifier == self.right {
            self.cardinality.map(Cardinality::reverse)
        } else {
            None
        }
    }

    /// Names of the rules that produced or refined this edge.
    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    /// Merge join keys into the edge.
    ///
    /// Schema keys are authoritative: they promote the edge to
    /// [`EdgeOrigin::Schema`] and overwrite. Inferred keys overwrite entries on
    /// an inferred edge but only fill gaps on a schema edge; they never change
    /// the origin.
    pub(crate) fn merge_keys<I>(&mut self, origin: EdgeOrigin, rule: &str, keys: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let authoritative = match origin {
            EdgeOrigin::Schema => {
                self.origin = EdgeOrigin::Schema;
                true
            }
            EdgeOrigin::Inferred => self.origin == EdgeOrigin::Inferred,
        };

        for (identifier, column) in keys {
            if !self.connects(&identifier) {
                continue;
            }
            if authoritative {
                self.key_map.insert(identifier, column);
            } else {
                self.key_map.entry(identifier).or_insert(column);
            }
        }

        if !self.rules.iter().any(|r| r == rule) {
            self.rules.push(rule.to_string());
        }
    }

    pub(crate) fn set_cardinality(&mut self, cardinality: Cardinality) {
        self.cardinality = Some(cardinality);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn test_inferred_merge_overwrites_only_given_entries() {
        let mut edge = Edge::new("a", "b", EdgeOrigin::Inferred);
        edge.merge_keys(EdgeOrigin::Inferred, "first", keys(&[("a", "id"), ("b", "a_id")]));
        edge.merge_keys(EdgeOrigin::Inferred, "second", keys(&[("b", "a_key")]));

        assert_eq!(edge.key_for("a"), Some("id"));
        assert_eq!(edge.key_for("b"), Some("a_key"));
        assert_eq!(edge.rules(), ["first", "second"]);
    }

    #[test]
    fn test_inferred_merge_never_downgrades_schema() {
        let mut edge = Edge::new("a", "b", EdgeOrigin::Schema);
        edge.merge_keys(EdgeOrigin::Schema, "schema", keys(&[("a", "b_id")]));
        edge.merge_keys(EdgeOrigin::Inferred, "naming", keys(&[("a", "other"), ("b", "id")]));

        assert_eq!(edge.origin(), EdgeOrigin::Schema);
        assert_eq!(edge.key_for("a"), Some("b_id"));
        assert_eq!(edge.key_for("b"), Some("id"));
    }

    #[test]
    fn test_schema_merge_promotes_inferred_edge() {
        let mut edge = Edge::new("a", "b", EdgeOrigin::Inferred);
        edge.merge_keys(EdgeOrigin::Inferred, "naming", keys(&[("a", "x")]));
        edge.merge_keys(EdgeOrigin::Schema, "schema", keys(&[("a", "y")]));
        assert!(edge.is_schema());
        assert_eq!(edge.key_for("a"), Some("y"));
    }

    #[test]
    fn test_keys_for_foreign_identifiers_are_ignored() {
        let mut edge = Edge::new("a", "b", EdgeOrigin::Inferred);
        edge.merge_keys(EdgeOrigin::Inferred, "naming", keys(&[("c", "id")]));
        assert!(edge.key_map().is_empty());
        assert!(!edge.is_resolved());
    }

    #[test]
    fn test_cardinality_orientation() {
        let mut edge = Edge::new("a", "b", EdgeOrigin::Inferred);
        assert_eq!(edge.cardinality(), None);
        edge.set_cardinality(Cardinality::OneToMany);
        assert_eq!(edge.cardinality_from("a"), Some(Cardinality::OneToMany));
        assert_eq!(edge.cardinality_from("b"), Some(Cardinality::ManyToOne));
        assert_eq!(edge.cardinality_from("c"), None);
        assert_eq!(edge.other("a"), Some("b"));
    }
}
