mod note;
mod player;

pub use note::Note;
pub use player::Player;

/// Identity shared by players and notes in fixture data.
pub type EntityId = u32;
