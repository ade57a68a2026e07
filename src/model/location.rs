use serde::{Deserialize, Serialize};

use super::character::PageInfo;
use super::reference::EntityReference;

/// A location and the references of the characters residing there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub dimension: String,
    #[serde(default)]
    pub residents: Vec<EntityReference>,
}

/// Response body of a location search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationPage {
    pub info: PageInfo,
    pub results: Vec<LocationRecord>,
}
