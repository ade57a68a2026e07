use serde::{Deserialize, Serialize};

/// Parameters of a paged character listing.
///
/// Blank filters are never sent: [`CharacterQuery::query_pairs`] drops any
/// value that is empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterQuery {
    pub page: u32,
    pub name: String,
    pub species: String,
}

impl Default for CharacterQuery {
    fn default() -> Self {
        Self {
            page: 1,
            name: String::new(),
            species: String::new(),
        }
    }
}

impl CharacterQuery {
    pub fn new(page: u32, name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            page,
            name: name.into(),
            species: species.into(),
        }
    }

    /// Query string parameters in request order, blanks omitted.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let page = self.page.to_string();
        [
            ("page", page.as_str()),
            ("name", self.name.as_str()),
            ("species", self.species.as_str()),
        ]
        .into_iter()
        .filter_map(|(key, value)| non_blank(value).map(|v| (key, v.to_string())))
        .collect()
    }
}

/// The trimmed value, or `None` when nothing is left.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_filters_are_omitted() {
        let query = CharacterQuery::new(2, "  rick ", "");
        assert_eq!(
            query.query_pairs(),
            vec![("page", "2".to_string()), ("name", "rick".to_string())]
        );

        let query = CharacterQuery::new(1, "", "   ");
        assert_eq!(query.query_pairs(), vec![("page", "1".to_string())]);
    }

    #[test]
    fn test_all_filters_present() {
        let query = CharacterQuery::new(3, "morty", "Human");
        let keys: Vec<_> = query.query_pairs().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["page", "name", "species"]);
    }
}
