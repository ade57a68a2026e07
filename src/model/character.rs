use serde::{Deserialize, Serialize};

use super::reference::EntityReference;

/// Life status as reported by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifeStatus {
    Alive,
    Dead,
    #[serde(rename = "unknown", other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Genderless,
    #[serde(rename = "unknown", other)]
    Unknown,
}

/// A reference paired with the display name the catalog gives it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedReference {
    pub name: String,
    #[serde(default)]
    pub url: EntityReference,
}

impl NamedReference {
    pub fn new(name: impl Into<String>, url: impl Into<EntityReference>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The referenced entity's id; `None` for "unknown" places with no URL.
    pub fn id(&self) -> Option<u32> {
        self.url.id()
    }
}

/// A character as returned by the catalog. Never mutated once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub id: u32,
    pub name: String,
    pub status: LifeStatus,
    pub species: String,
    /// Sub-species or variant, frequently empty.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: Gender,
    #[serde(default)]
    pub image: String,
    pub origin: NamedReference,
    pub location: NamedReference,
}

impl CharacterRecord {
    /// Id of the location this character originated from, if known.
    pub fn origin_id(&self) -> Option<u32> {
        self.origin.id()
    }
}

/// Paging metadata attached to every listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub prev: Option<String>,
}

/// One server-side page of characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<CharacterRecord>,
}
