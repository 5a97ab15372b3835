// src/engine/query.rs
use serde::{Deserialize, Serialize};

use crate::entity::Player;
use crate::error::RosterError;

/// Status filter applied after the search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FilterMode {
    #[default]
    All,
    /// Only players that are overdue for a note.
    MissingNotes,
    /// Only players with a note inside the overdue window.
    RecentNotes,
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::All => write!(f, "all"),
            FilterMode::MissingNotes => write!(f, "missing-notes"),
            FilterMode::RecentNotes => write!(f, "recent-notes"),
        }
    }
}

impl std::str::FromStr for FilterMode {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "all" => Ok(FilterMode::All),
            "missing-notes" | "missing" | "overdue" => Ok(FilterMode::MissingNotes),
            "recent-notes" | "recent" => Ok(FilterMode::RecentNotes),
            _ => Err(RosterError::InvalidFilterMode(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    #[default]
    #[serde(rename = "name")]
    NameAsc,
    NameDesc,
    /// Most recent last note first, players without notes last.
    RecentNote,
    /// Oldest last note first, players without notes last.
    OldestNote,
    Position,
}

impl std::fmt::Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortMode::NameAsc => write!(f, "name"),
            SortMode::NameDesc => write!(f, "name-desc"),
            SortMode::RecentNote => write!(f, "recent-note"),
            SortMode::OldestNote => write!(f, "oldest-note"),
            SortMode::Position => write!(f, "position"),
        }
    }
}

impl std::str::FromStr for SortMode {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "name" | "name-asc" => Ok(SortMode::NameAsc),
            "name-desc" => Ok(SortMode::NameDesc),
            "recent-note" | "recent" => Ok(SortMode::RecentNote),
            "oldest-note" | "oldest" => Ok(SortMode::OldestNote),
            "position" => Ok(SortMode::Position),
            _ => Err(RosterError::InvalidSortMode(s.to_string())),
        }
    }
}

/// Search term, status filter and sort order driving the roster view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub search_term: String,
    pub filter: FilterMode,
    pub sort: SortMode,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_filter(mut self, filter: FilterMode) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    /// Whether a "clear filters" action would change anything.
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.is_empty() || self.filter != FilterMode::All
    }

    /// Reset the search term and status filter. Sort order is kept.
    pub fn clear_filters(&mut self) {
        self.search_term.clear();
        self.filter = FilterMode::All;
    }

    /// Case-insensitive substring match on name or position.
    ///
    /// A blank (whitespace-only) term matches everyone; otherwise the term is
    /// used as typed, surrounding whitespace included.
    pub fn matches_search(&self, player: &Player) -> bool {
        if self.search_term.trim().is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        player.name.to_lowercase().contains(&needle)
            || player.position.to_lowercase().contains(&needle)
    }
}
