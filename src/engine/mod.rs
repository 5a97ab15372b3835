//! Roster derivation engine.
//!
//! Pure functions over the player and note collections. Nothing here holds
//! state: every derived fact (last note, overdue flag, days since the last
//! note, the filtered and sorted view) is recomputed from the inputs and the
//! date supplied by the caller.

mod collate;
mod query;

pub use collate::collate;
pub use query::{FilterMode, Query, SortMode};

use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::entity::{EntityId, Note, Player};

/// A player is overdue once their last note is more than this many days old.
pub const DEFAULT_OVERDUE_DAYS: i64 = 30;

/// The reference date and window used to decide whether a player is overdue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverduePolicy {
    pub today: NaiveDate,
    pub after_days: i64,
}

impl OverduePolicy {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            after_days: DEFAULT_OVERDUE_DAYS,
        }
    }

    pub fn with_threshold(mut self, after_days: i64) -> Self {
        self.after_days = after_days;
        self
    }

    /// Whole days elapsed between `date` and today.
    pub fn days_since(&self, date: NaiveDate) -> i64 {
        (self.today - date).num_days()
    }

    /// Overdue when there is no note, or the note is older than the window.
    pub fn is_overdue_by(&self, last_note: Option<&Note>) -> bool {
        match last_note {
            None => true,
            Some(note) => self.days_since(note.date) > self.after_days,
        }
    }
}

/// The most recent note for a player.
///
/// Notes are folded in input order and a later note only replaces the
/// current pick when its date is strictly greater, so the first note seen
/// wins a tie.
pub fn last_note_for(player_id: EntityId, notes: &[Note]) -> Option<&Note> {
    notes
        .iter()
        .filter(|n| n.player_id == player_id)
        .fold(None, |latest: Option<&Note>, current| match latest {
            Some(l) if current.date <= l.date => Some(l),
            _ => Some(current),
        })
}

/// Whether a player needs a new note, using the default 30-day window.
pub fn is_overdue(player_id: EntityId, notes: &[Note], today: NaiveDate) -> bool {
    OverduePolicy::new(today).is_overdue_by(last_note_for(player_id, notes))
}

/// Days since the player's last note, or `None` when they have none.
pub fn days_since_last_note(player_id: EntityId, notes: &[Note], today: NaiveDate) -> Option<i64> {
    let policy = OverduePolicy::new(today);
    last_note_for(player_id, notes).map(|n| policy.days_since(n.date))
}

/// All notes for one player, most recent first. Notes sharing a date keep
/// their input order.
pub fn notes_for_player(player_id: EntityId, notes: &[Note]) -> Vec<&Note> {
    let mut player_notes: Vec<&Note> = notes.iter().filter(|n| n.player_id == player_id).collect();
    player_notes.sort_by(|a, b| b.date.cmp(&a.date));
    player_notes
}

/// Last note per player, computed in a single pass with the same tie rule as
/// [`last_note_for`].
fn last_notes_by_player(notes: &[Note]) -> HashMap<EntityId, &Note> {
    let mut latest: HashMap<EntityId, &Note> = HashMap::new();
    for note in notes {
        latest
            .entry(note.player_id)
            .and_modify(|current| {
                if note.date > current.date {
                    *current = note;
                }
            })
            .or_insert(note);
    }
    latest
}

/// Players without a note always sort after players with one, whatever the
/// direction.
fn compare_last_notes(a: Option<&Note>, b: Option<&Note>, newest_first: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) if newest_first => b.date.cmp(&a.date),
        (Some(a), Some(b)) => a.date.cmp(&b.date),
    }
}

/// Apply the search filter, then the status filter, then a stable sort.
pub fn filter_and_sort<'a>(
    players: &'a [Player],
    notes: &[Note],
    query: &Query,
    policy: &OverduePolicy,
) -> Vec<&'a Player> {
    let latest = last_notes_by_player(notes);
    let last = |id: EntityId| latest.get(&id).copied();

    let mut view: Vec<&Player> = players
        .iter()
        .filter(|p| query.matches_search(p))
        .filter(|p| match query.filter {
            FilterMode::All => true,
            FilterMode::MissingNotes => policy.is_overdue_by(last(p.id)),
            FilterMode::RecentNotes => !policy.is_overdue_by(last(p.id)),
        })
        .collect();

    // `sort_by` is stable, so equal keys keep their input order.
    match query.sort {
        SortMode::NameAsc => view.sort_by(|a, b| collate(&a.name, &b.name)),
        SortMode::NameDesc => view.sort_by(|a, b| collate(&b.name, &a.name)),
        SortMode::Position => view.sort_by(|a, b| collate(&a.position, &b.position)),
        SortMode::RecentNote => {
            view.sort_by(|a, b| compare_last_notes(last(a.id), last(b.id), true))
        }
        SortMode::OldestNote => {
            view.sort_by(|a, b| compare_last_notes(last(a.id), last(b.id), false))
        }
    }

    view
}

/// Number of overdue players across the whole roster.
pub fn overdue_count(players: &[Player], notes: &[Note], policy: &OverduePolicy) -> usize {
    let latest = last_notes_by_player(notes);
    players
        .iter()
        .filter(|p| policy.is_overdue_by(latest.get(&p.id).copied()))
        .count()
}

/// One row of the roster view with its derived facts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCard<'a> {
    pub player: &'a Player,
    pub last_note: Option<&'a Note>,
    pub is_overdue: bool,
    pub days_ago: Option<i64>,
}

/// The filtered, sorted roster plus header totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterView<'a> {
    pub cards: Vec<PlayerCard<'a>>,
    pub total_players: usize,
    /// Counted over every player, not only the filtered ones.
    pub overdue_count: usize,
}

impl RosterView<'_> {
    pub fn showing(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Build the full roster view for a query.
pub fn roster_view<'a>(
    players: &'a [Player],
    notes: &'a [Note],
    query: &Query,
    policy: &OverduePolicy,
) -> RosterView<'a> {
    let latest = last_notes_by_player(notes);
    let cards = filter_and_sort(players, notes, query, policy)
        .into_iter()
        .map(|player| {
            let last_note = latest.get(&player.id).copied();
            PlayerCard {
                player,
                last_note,
                is_overdue: policy.is_overdue_by(last_note),
                days_ago: last_note.map(|n| policy.days_since(n.date)),
            }
        })
        .collect();

    RosterView {
        cards,
        total_players: players.len(),
        overdue_count: overdue_count(players, notes, policy),
    }
}
