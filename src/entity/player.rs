// src/entity/player.rs
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A squad member. Players are fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: EntityId,
    pub name: String,
    /// Short position code such as "GK" or "CM".
    pub position: String,
    pub jersey_number: u16,
    pub age: u16,
}

impl Player {
    /// Test helper: a player with only identity, name and position set.
    #[cfg(test)]
    pub fn new(id: EntityId, name: impl Into<String>, position: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            position: position.into(),
            jersey_number: 0,
            age: 0,
        }
    }
}
