// src/entity/note.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// A dated coaching note attached to one player. Notes are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: EntityId,
    pub player_id: EntityId,
    pub date: NaiveDate,
    #[serde(rename = "note")]
    pub text: String,
    #[serde(rename = "createdBy")]
    pub author: String,
}

impl Note {
    pub fn new(
        id: EntityId,
        player_id: EntityId,
        date: NaiveDate,
        text: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            id,
            player_id,
            date,
            text: text.into(),
            author: author.into(),
        }
    }
}
