//! The symptom catalog.
//!
//! A `SymptomCatalog` is the closed set of identifiers the matcher knows
//! about. Anything outside it is silently dropped by `normalize`. The
//! built-in catalog is embedded from `data/symptoms.toml`.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use symtriage_contracts::{
    error::{TriageError, TriageResult},
    symptom::{Symptom, SymptomId, SymptomSet},
};

const BUILTIN_SYMPTOMS: &str = include_str!("../data/symptoms.toml");

/// On-disk shape of a catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    symptoms: Vec<Symptom>,
}

/// The ordered, closed set of known symptoms.
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    symptoms: Vec<Symptom>,
    index: HashMap<SymptomId, usize>,
}

impl SymptomCatalog {
    /// The catalog shipped with the crate.
    ///
    /// The embedded document is covered by tests, so a parse failure here is
    /// a build defect rather than a runtime condition.
    pub fn builtin() -> Self {
        Self::from_toml_str(BUILTIN_SYMPTOMS).expect("embedded symptom catalog must be valid")
    }

    /// Parse a catalog from TOML.
    ///
    /// Returns `TriageError::ConfigError` for malformed TOML or duplicate
    /// identifiers.
    pub fn from_toml_str(s: &str) -> TriageResult<Self> {
        let doc: CatalogDocument = toml::from_str(s).map_err(|e| TriageError::ConfigError {
            reason: format!("failed to parse symptom catalog TOML: {}", e),
        })?;
        Self::from_symptoms(doc.symptoms)
    }

    /// Read and parse a catalog file.
    pub fn from_file(path: &Path) -> TriageResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| TriageError::ConfigError {
            reason: format!("failed to read symptom catalog '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Build a catalog from an ordered list, rejecting duplicate ids.
    pub fn from_symptoms(symptoms: Vec<Symptom>) -> TriageResult<Self> {
        let mut index = HashMap::with_capacity(symptoms.len());
        for (pos, symptom) in symptoms.iter().enumerate() {
            if index.insert(symptom.id.clone(), pos).is_some() {
                return Err(TriageError::ConfigError {
                    reason: format!("duplicate symptom id '{}' in catalog", symptom.id),
                });
            }
        }
        debug!(count = symptoms.len(), "symptom catalog loaded");
        Ok(Self { symptoms, index })
    }

    pub fn get(&self, id: &SymptomId) -> Option<&Symptom> {
        self.index.get(id).map(|&pos| &self.symptoms[pos])
    }

    pub fn contains(&self, id: &SymptomId) -> bool {
        self.index.contains_key(id)
    }

    /// All symptoms in declaration order.
    pub fn all(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }

    /// Drop identifiers that are not in the catalog.
    pub fn normalize(&self, input: &SymptomSet) -> SymptomSet {
        input.iter().filter(|id| self.contains(id)).cloned().collect()
    }

    /// Symptoms whose display name contains `term`, case-insensitively.
    /// An empty term returns the whole catalog.
    pub fn search(&self, term: &str) -> Vec<&Symptom> {
        let needle = term.trim().to_lowercase();
        self.symptoms
            .iter()
            .filter(|s| s.display_name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Extract catalog symptoms mentioned in free text.
    ///
    /// A symptom is found when its display name, its identifier with `_`
    /// read as a space, or one of its aliases appears in the text as a whole
    /// phrase (case-insensitive).
    pub fn extract_from_text(&self, text: &str) -> SymptomSet {
        let haystack = text.to_lowercase();
        self.symptoms
            .iter()
            .filter(|s| phrases(s).any(|p| contains_phrase(&haystack, &p)))
            .map(|s| s.id.clone())
            .collect()
    }
}

impl Default for SymptomCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn phrases(symptom: &Symptom) -> impl Iterator<Item = String> + '_ {
    [
        symptom.display_name.to_lowercase(),
        symptom.id.as_str().replace('_', " "),
    ]
    .into_iter()
    .chain(symptom.aliases.iter().map(|a| a.to_lowercase()))
}

/// True if `needle` occurs in `haystack` with no letter or digit directly
/// on either side.
fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
