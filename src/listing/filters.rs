use serde::{Deserialize, Serialize};

use crate::catalog::non_blank;
use crate::model::CharacterRecord;

/// Raw filter inputs as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingFilters {
    pub name: String,
    pub species: String,
    pub location: String,
}

/// Which listing strategy the filters select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingMode {
    /// The catalog filters and pages by name and species.
    Direct,
    /// Residents of a named location, filtered and paged locally.
    Location,
}

impl ListingFilters {
    pub fn new(
        name: impl Into<String>,
        species: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            location: location.into(),
        }
    }

    pub fn mode(&self) -> ListingMode {
        if non_blank(&self.location).is_some() {
            ListingMode::Location
        } else {
            ListingMode::Direct
        }
    }

    /// Case-insensitive substring match on name and species; blank filters
    /// match everything.
    pub fn matches(&self, record: &CharacterRecord) -> bool {
        contains_folded(&record.name, &self.name) && contains_folded(&record.species, &self.species)
    }

    pub fn apply(&self, records: Vec<CharacterRecord>) -> Vec<CharacterRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    match non_blank(needle) {
        Some(needle) => haystack.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::mock::fixture_character;

    #[test]
    fn test_mode_follows_trimmed_location() {
        assert_eq!(ListingFilters::new("rick", "", "").mode(), ListingMode::Direct);
        assert_eq!(ListingFilters::new("", "", "   ").mode(), ListingMode::Direct);
        assert_eq!(ListingFilters::new("", "", "earth").mode(), ListingMode::Location);
    }

    #[test]
    fn test_client_side_matching() {
        let rick = fixture_character(1, "Rick Sanchez", "Human", Some(1));
        let squanchy = fixture_character(2, "Squanchy", "Cat-Person", Some(4));

        let filters = ListingFilters::new(" RICK", "", "earth");
        assert!(filters.matches(&rick));
        assert!(!filters.matches(&squanchy));

        let filters = ListingFilters::new("", "cat", "earth");
        assert_eq!(filters.apply(vec![rick, squanchy.clone()]), vec![squanchy]);
    }
}
