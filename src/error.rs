use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Note {note_id} has an invalid date '{value}' (expected YYYY-MM-DD)")]
    InvalidDate { note_id: u32, value: String },

    #[error("Note {note_id} references unknown player {player_id}")]
    UnknownPlayer { note_id: u32, player_id: u32 },

    #[error("Duplicate player id: {0}")]
    DuplicatePlayerId(u32),

    #[error("Duplicate note id: {0}")]
    DuplicateNoteId(u32),

    #[error("Note {0} has empty text")]
    EmptyNoteText(u32),

    #[error("No note ids left: the highest id is already in use")]
    NoteIdsExhausted,

    #[error("Player {player_id} has invalid {field}: must be a positive integer")]
    InvalidPlayerField { player_id: u32, field: &'static str },

    #[error("Player not found: {0}")]
    PlayerNotFound(u32),

    #[error("Invalid filter mode: {0} (expected all, missing-notes, recent-notes)")]
    InvalidFilterMode(String),

    #[error("Invalid sort mode: {0} (expected name, name-desc, recent-note, oldest-note, position)")]
    InvalidSortMode(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RosterError>;
