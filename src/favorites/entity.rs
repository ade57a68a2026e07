use serde::{Deserialize, Serialize};

use crate::model::{CharacterRecord, Gender, LifeStatus, NamedReference};

/// The part of a character kept in favorites: enough to list it again
/// without a catalog round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteSnapshot {
    pub id: u32,
    pub name: String,
    pub status: LifeStatus,
    pub species: String,
    pub gender: Gender,
    pub image: String,
    pub origin: NamedReference,
    pub location: NamedReference,
}

impl From<&CharacterRecord> for FavoriteSnapshot {
    fn from(record: &CharacterRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            status: record.status,
            species: record.species.clone(),
            gender: record.gender,
            image: record.image.clone(),
            origin: record.origin.clone(),
            location: record.location.clone(),
        }
    }
}

/// Change notifications for subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavoritesEvent {
    Added(u32),
    Removed(u32),
    Cleared,
}
