//! Opaque entity references and numeric id extraction.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A URL-like pointer to another catalog entity, e.g.
/// `https://rickandmortyapi.com/api/location/20`.
///
/// The trailing non-empty path segment carries the numeric id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityReference(String);

impl EntityReference {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The id this reference points at, if it ends in one.
    pub fn id(&self) -> Option<u32> {
        extract_id(Some(&self.0))
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityReference {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for EntityReference {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

/// Extracts the numeric id from the last non-empty `/`-separated segment.
///
/// Total over all inputs: missing, empty, or non-numeric references yield
/// `None`. Only positive integers are accepted.
pub fn extract_id(reference: Option<&str>) -> Option<u32> {
    let last = reference?.split('/').filter(|s| !s.is_empty()).last()?;
    last.trim().parse::<u32>().ok().filter(|id| *id > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_trailing_numeric_segment() {
        assert_eq!(extract_id(Some("https://api.example/location/20")), Some(20));
        assert_eq!(extract_id(Some("https://api.example/character/7/")), Some(7));
        assert_eq!(extract_id(Some("42")), Some(42));
    }

    #[test]
    fn test_absent_for_missing_or_malformed() {
        assert_eq!(extract_id(None), None);
        assert_eq!(extract_id(Some("")), None);
        assert_eq!(extract_id(Some("///")), None);
        assert_eq!(extract_id(Some("https://api.example/location/earth")), None);
        assert_eq!(extract_id(Some("https://api.example/location/0")), None);
        assert_eq!(extract_id(Some("https://api.example/location/-3")), None);
        assert_eq!(extract_id(Some("https://api.example/location/1.5")), None);
        assert_eq!(extract_id(Some("https://api.example/location/99999999999")), None);
    }

    #[test]
    fn test_reference_id_matches_extractor() {
        let reference = EntityReference::from("https://api.example/character/3");
        assert_eq!(reference.id(), Some(3));
        assert_eq!(EntityReference::default().id(), None);
    }
}
