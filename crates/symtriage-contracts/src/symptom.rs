//! Symptom identity types.
//!
//! A symptom is named by a short, stable identifier (e.g. "fever",
//! "shortness_breath"). Sets of identifiers are order-independent; the
//! matcher and the analytics log both see them through `SymptomSet`.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable short code naming a reportable patient-observed sign.
///
/// Example: SymptomId("sore_throat")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomId(pub String);

impl SymptomId {
    /// Construct an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SymptomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymptomId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One entry in the symptom catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptom {
    /// Stable identifier used in rule tables and analytics.
    pub id: SymptomId,
    /// Human-readable name shown to patients (e.g. "Shortness of Breath").
    pub display_name: String,
    /// Extra phrases recognised when extracting symptoms from free text.
    #[serde(default)]
    pub aliases: Vec<String>,
}

/// An order-independent, duplicate-free set of symptom identifiers.
///
/// Backed by a `BTreeSet` so iteration order is sorted and stable, which
/// keeps analytics records and exact-set comparisons deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomSet {
    inner: BTreeSet<SymptomId>,
}

impl SymptomSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an identifier. Returns false if it was already present.
    pub fn insert(&mut self, id: SymptomId) -> bool {
        self.inner.insert(id)
    }

    pub fn contains(&self, id: &SymptomId) -> bool {
        self.inner.contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Iterate identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &SymptomId> {
        self.inner.iter()
    }

    /// Number of identifiers present in both sets.
    pub fn overlap(&self, other: &SymptomSet) -> usize {
        self.inner.intersection(&other.inner).count()
    }

    /// Identifiers as plain strings, sorted.
    pub fn to_strings(&self) -> Vec<String> {
        self.inner.iter().map(|id| id.0.clone()).collect()
    }
}

impl FromIterator<SymptomId> for SymptomSet {
    fn from_iter<I: IntoIterator<Item = SymptomId>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for SymptomSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        iter.into_iter().map(SymptomId::from).collect()
    }
}

impl<'a> IntoIterator for &'a SymptomSet {
    type Item = &'a SymptomId;
    type IntoIter = std::collections::btree_set::Iter<'a, SymptomId>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
