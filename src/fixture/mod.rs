//! Fixture ingestion.
//!
//! Players and notes arrive as two JSON arrays. Records are parsed into
//! loosely-typed raw shapes first, then validated into entities so that bad
//! dates, dangling player references and identity collisions are reported at
//! load time instead of leaking into sorting or day arithmetic.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::entity::{EntityId, Note, Player};
use crate::error::{RosterError, Result};

/// Built-in player fixtures, used when no players file is configured.
pub const DEFAULT_PLAYERS: &str = include_str!("../../data/players.json");
/// Built-in note fixtures, used when no notes file is configured.
pub const DEFAULT_NOTES: &str = include_str!("../../data/notes.json");

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A note record as it appears on disk, before the date is checked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNote {
    id: EntityId,
    player_id: EntityId,
    date: String,
    note: String,
    created_by: String,
}

/// Validated fixture collections.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub players: Vec<Player>,
    pub notes: Vec<Note>,
}

impl Fixtures {
    /// Parse and validate fixture JSON text.
    pub fn from_json(players_json: &str, notes_json: &str) -> Result<Self> {
        let players: Vec<Player> = serde_json::from_str(players_json)?;
        let raw_notes: Vec<RawNote> = serde_json::from_str(notes_json)?;
        Self::validate(players, raw_notes)
    }

    /// Read fixtures from files, falling back to the built-in set for any
    /// path that is `None`.
    pub fn load(players_path: Option<&Path>, notes_path: Option<&Path>) -> Result<Self> {
        let players_json = match players_path {
            Some(path) => fs::read_to_string(path)?,
            None => DEFAULT_PLAYERS.to_string(),
        };
        let notes_json = match notes_path {
            Some(path) => fs::read_to_string(path)?,
            None => DEFAULT_NOTES.to_string(),
        };
        Self::from_json(&players_json, &notes_json)
    }

    /// The built-in fixture set.
    pub fn builtin() -> Result<Self> {
        Self::from_json(DEFAULT_PLAYERS, DEFAULT_NOTES)
    }

    fn validate(players: Vec<Player>, raw_notes: Vec<RawNote>) -> Result<Self> {
        let mut player_ids = HashSet::with_capacity(players.len());
        for player in &players {
            if !player_ids.insert(player.id) {
                return Err(RosterError::DuplicatePlayerId(player.id));
            }
            if player.jersey_number == 0 {
                return Err(RosterError::InvalidPlayerField {
                    player_id: player.id,
                    field: "jerseyNumber",
                });
            }
            if player.age == 0 {
                return Err(RosterError::InvalidPlayerField {
                    player_id: player.id,
                    field: "age",
                });
            }
        }

        let mut note_ids = HashSet::with_capacity(raw_notes.len());
        let mut notes = Vec::with_capacity(raw_notes.len());
        for raw in raw_notes {
            if !note_ids.insert(raw.id) {
                return Err(RosterError::DuplicateNoteId(raw.id));
            }
            let date = parse_note_date(&raw.date).ok_or_else(|| RosterError::InvalidDate {
                note_id: raw.id,
                value: raw.date.clone(),
            })?;
            if raw.note.trim().is_empty() {
                return Err(RosterError::EmptyNoteText(raw.id));
            }
            if !player_ids.contains(&raw.player_id) {
                return Err(RosterError::UnknownPlayer {
                    note_id: raw.id,
                    player_id: raw.player_id,
                });
            }
            notes.push(Note::new(raw.id, raw.player_id, date, raw.note, raw.created_by));
        }

        debug!(players = players.len(), notes = notes.len(), "fixtures validated");
        Ok(Self { players, notes })
    }
}

/// Parse a day-granularity ISO date (`YYYY-MM-DD`).
pub fn parse_note_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYERS: &str = r#"[
        { "id": 1, "name": "Ali", "position": "ST", "jerseyNumber": 9, "age": 22 },
        { "id": 2, "name": "Smith", "position": "GK", "jerseyNumber": 1, "age": 30 }
    ]"#;

    #[test]
    fn test_builtin_fixtures_are_valid() {
        let fixtures = Fixtures::builtin().unwrap();
        assert!(!fixtures.players.is_empty());
        assert!(!fixtures.notes.is_empty());
    }

    #[test]
    fn test_parses_valid_notes() {
        let notes = r#"[
            { "id": 1, "playerId": 2, "date": "2024-01-01", "note": "Good", "createdBy": "Coach" }
        ]"#;
        let fixtures = Fixtures::from_json(PLAYERS, notes).unwrap();
        assert_eq!(fixtures.players.len(), 2);
        assert_eq!(fixtures.notes[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(fixtures.notes[0].author, "Coach");
    }

    #[test]
    fn test_rejects_invalid_date() {
        let notes = r#"[
            { "id": 4, "playerId": 1, "date": "2024-13-01", "note": "x", "createdBy": "c" }
        ]"#;
        let err = Fixtures::from_json(PLAYERS, notes).unwrap_err();
        match err {
            RosterError::InvalidDate { note_id, value } => {
                assert_eq!(note_id, 4);
                assert_eq!(value, "2024-13-01");
            }
            other => panic!("Expected InvalidDate, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_player() {
        let notes = r#"[
            { "id": 1, "playerId": 99, "date": "2024-01-01", "note": "x", "createdBy": "c" }
        ]"#;
        let err = Fixtures::from_json(PLAYERS, notes).unwrap_err();
        assert!(matches!(
            err,
            RosterError::UnknownPlayer { note_id: 1, player_id: 99 }
        ));
    }

    #[test]
    fn test_rejects_duplicate_note_id() {
        let notes = r#"[
            { "id": 1, "playerId": 1, "date": "2024-01-01", "note": "a", "createdBy": "c" },
            { "id": 1, "playerId": 2, "date": "2024-01-02", "note": "b", "createdBy": "c" }
        ]"#;
        let err = Fixtures::from_json(PLAYERS, notes).unwrap_err();
        assert!(matches!(err, RosterError::DuplicateNoteId(1)));
    }

    #[test]
    fn test_rejects_duplicate_player_id() {
        let players = r#"[
            { "id": 1, "name": "A", "position": "ST", "jerseyNumber": 9, "age": 22 },
            { "id": 1, "name": "B", "position": "GK", "jerseyNumber": 1, "age": 30 }
        ]"#;
        let err = Fixtures::from_json(players, "[]").unwrap_err();
        assert!(matches!(err, RosterError::DuplicatePlayerId(1)));
    }

    #[test]
    fn test_rejects_zero_jersey_number_and_age() {
        let players = r#"[
            { "id": 3, "name": "A", "position": "ST", "jerseyNumber": 0, "age": 22 }
        ]"#;
        let err = Fixtures::from_json(players, "[]").unwrap_err();
        assert!(matches!(
            err,
            RosterError::InvalidPlayerField { player_id: 3, field: "jerseyNumber" }
        ));

        let players = r#"[
            { "id": 4, "name": "B", "position": "GK", "jerseyNumber": 1, "age": 0 }
        ]"#;
        let err = Fixtures::from_json(players, "[]").unwrap_err();
        assert!(matches!(
            err,
            RosterError::InvalidPlayerField { player_id: 4, field: "age" }
        ));
    }

    #[test]
    fn test_negative_age_is_json_error() {
        let players = r#"[
            { "id": 1, "name": "A", "position": "ST", "jerseyNumber": 9, "age": -2 }
        ]"#;
        let err = Fixtures::from_json(players, "[]").unwrap_err();
        assert!(matches!(err, RosterError::Json(_)));
    }

    #[test]
    fn test_rejects_blank_note_text() {
        let notes = r#"[
            { "id": 3, "playerId": 1, "date": "2024-01-01", "note": "   ", "createdBy": "c" }
        ]"#;
        let err = Fixtures::from_json(PLAYERS, notes).unwrap_err();
        assert!(matches!(err, RosterError::EmptyNoteText(3)));
    }

    #[test]
    fn test_malformed_record_is_json_error() {
        let err = Fixtures::from_json(r#"[{ "id": 1 }]"#, "[]").unwrap_err();
        assert!(matches!(err, RosterError::Json(_)));
    }
}
