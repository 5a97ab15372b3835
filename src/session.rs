//! Session state owned by the presentation layer.
//!
//! A [`Session`] holds the loaded collections, the note-id counter and the
//! session author, and hands plain values to the engine. View state (the
//! current query, selected player, whether the detail view is open) lives in
//! [`ViewState`] so the engine never sees it.

use std::time::Duration;

use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::RosterConfig;
use crate::engine::{self, OverduePolicy, Query, RosterView};
use crate::entity::{EntityId, Note, Player};
use crate::error::{RosterError, Result};
use crate::fixture::Fixtures;

/// Source of "today" for overdue and note-date calculations.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local wall-clock date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<T: Clock + ?Sized> Clock for Box<T> {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }
}

/// Artificial delay standing in for a network round trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency(Duration);

impl Latency {
    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    /// Wait out the delay. Always completes; there is no cancellation.
    pub async fn settle(&self) {
        if !self.0.is_zero() {
            debug!(ms = self.0.as_millis() as u64, "simulated latency");
            tokio::time::sleep(self.0).await;
        }
    }
}

/// A player with all notes, most recent first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDetail<'a> {
    pub player: &'a Player,
    pub notes: Vec<&'a Note>,
    pub note_count: usize,
    /// First entry of `notes`, shown as the latest note.
    pub latest: Option<&'a Note>,
    pub is_overdue: bool,
    pub days_ago: Option<i64>,
}

/// In-memory roster session. Notes only ever grow.
pub struct Session<C: Clock = SystemClock> {
    players: Vec<Player>,
    notes: Vec<Note>,
    /// Highest note id handed out so far.
    last_note_id: EntityId,
    author: String,
    overdue_after_days: i64,
    submit_latency: Latency,
    clock: C,
}

impl<C: Clock> Session<C> {
    /// Load fixtures after the configured load delay.
    pub async fn load_with_clock(config: &RosterConfig, clock: C) -> Result<Self> {
        Latency::from_millis(config.load_delay_ms).settle().await;
        let fixtures = Fixtures::load(config.players_path.as_deref(), config.notes_path.as_deref())?;
        info!(
            players = fixtures.players.len(),
            notes = fixtures.notes.len(),
            "roster loaded"
        );
        Ok(Self::from_fixtures(fixtures, config, clock))
    }

    pub fn from_fixtures(fixtures: Fixtures, config: &RosterConfig, clock: C) -> Self {
        let last_note_id = fixtures.notes.iter().map(|n| n.id).max().unwrap_or(0);
        Self {
            players: fixtures.players,
            notes: fixtures.notes,
            last_note_id,
            author: config.author.clone(),
            overdue_after_days: config.overdue_after_days,
            submit_latency: Latency::from_millis(config.submit_delay_ms),
            clock,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn policy(&self) -> OverduePolicy {
        OverduePolicy::new(self.clock.today()).with_threshold(self.overdue_after_days)
    }

    pub fn player(&self, id: EntityId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(RosterError::PlayerNotFound(id))
    }

    pub fn view(&self, query: &Query) -> RosterView<'_> {
        engine::roster_view(&self.players, &self.notes, query, &self.policy())
    }

    pub fn overdue_count(&self) -> usize {
        engine::overdue_count(&self.players, &self.notes, &self.policy())
    }

    pub fn detail(&self, player_id: EntityId) -> Result<PlayerDetail<'_>> {
        let player = self.player(player_id)?;
        let notes = engine::notes_for_player(player_id, &self.notes);
        let policy = self.policy();
        let last = engine::last_note_for(player_id, &self.notes);
        Ok(PlayerDetail {
            player,
            note_count: notes.len(),
            latest: notes.first().copied(),
            notes,
            is_overdue: policy.is_overdue_by(last),
            days_ago: last.map(|n| policy.days_since(n.date)),
        })
    }

    /// Append a note dated today and authored by the session identity.
    ///
    /// Blank text is ignored and returns `Ok(None)`. Stored text is trimmed.
    pub fn add_note(&mut self, player_id: EntityId, text: &str) -> Result<Option<Note>> {
        let text = text.trim();
        if text.is_empty() {
            debug!(player_id, "ignoring blank note");
            return Ok(None);
        }
        self.player(player_id)?;
        let id = self
            .last_note_id
            .checked_add(1)
            .ok_or(RosterError::NoteIdsExhausted)?;

        let note = Note::new(
            id,
            player_id,
            self.clock.today(),
            text,
            self.author.clone(),
        );
        self.last_note_id = id;
        self.notes.push(note.clone());
        info!(note_id = note.id, player_id, "note added");
        Ok(Some(note))
    }

    /// [`Session::add_note`] behind the configured submission delay.
    pub async fn submit_note(&mut self, player_id: EntityId, text: &str) -> Result<Option<Note>> {
        if text.trim().is_empty() {
            return Ok(None);
        }
        self.submit_latency.settle().await;
        self.add_note(player_id, text)
    }
}

/// Ephemeral presentation state: current query and detail-view selection.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub query: Query,
    selected: Option<EntityId>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, player_id: EntityId) {
        self.selected = Some(player_id);
    }

    pub fn close(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn is_detail_open(&self) -> bool {
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FilterMode;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session(today: NaiveDate) -> Session<FixedClock> {
        let players = vec![Player::new(1, "Ali", "ST"), Player::new(2, "Smith", "GK")];
        let notes = vec![
            Note::new(4, 2, date(2024, 1, 1), "Solid", "Coach Ahmed"),
            Note::new(9, 2, date(2023, 12, 1), "Early", "Coach Ahmed"),
        ];
        let config = RosterConfig::instant();
        Session::from_fixtures(Fixtures { players, notes }, &config, FixedClock(today))
    }

    #[test]
    fn test_add_note_assigns_fresh_id_and_today() {
        let mut s = session(date(2024, 1, 10));
        let note = s.add_note(1, "  Good pressing  ").unwrap().unwrap();
        assert_eq!(note.id, 10);
        assert_eq!(note.date, date(2024, 1, 10));
        assert_eq!(note.text, "Good pressing");
        assert_eq!(note.author, "Coach Ahmed");
        assert_eq!(s.notes().len(), 3);

        let second = s.add_note(1, "Again").unwrap().unwrap();
        assert_eq!(second.id, 11);
    }

    #[test]
    fn test_add_note_fails_when_ids_are_exhausted() {
        let players = vec![Player::new(1, "Ali", "ST")];
        let notes = vec![Note::new(u32::MAX, 1, date(2024, 1, 1), "Last id", "Coach Ahmed")];
        let mut s = Session::from_fixtures(
            Fixtures { players, notes },
            &RosterConfig::instant(),
            FixedClock(date(2024, 1, 10)),
        );

        assert!(matches!(
            s.add_note(1, "One more"),
            Err(RosterError::NoteIdsExhausted)
        ));
        assert_eq!(s.notes().len(), 1);
        assert!(s.add_note(1, "   ").unwrap().is_none());
    }

    #[test]
    fn test_add_blank_note_is_ignored() {
        let mut s = session(date(2024, 1, 10));
        assert!(s.add_note(1, "   ").unwrap().is_none());
        assert_eq!(s.notes().len(), 2);
    }

    #[test]
    fn test_add_note_for_unknown_player_fails() {
        let mut s = session(date(2024, 1, 10));
        assert!(matches!(s.add_note(42, "Hello"), Err(RosterError::PlayerNotFound(42))));
        assert_eq!(s.notes().len(), 2);
    }

    #[test]
    fn test_adding_note_clears_overdue() {
        let mut s = session(date(2024, 1, 10));
        assert_eq!(s.overdue_count(), 1);
        s.add_note(1, "First look").unwrap();
        assert_eq!(s.overdue_count(), 0);

        let query = Query::new().with_filter(FilterMode::MissingNotes);
        assert!(s.view(&query).is_empty());
    }

    #[test]
    fn test_detail_lists_notes_most_recent_first() {
        let s = session(date(2024, 2, 5));
        let detail = s.detail(2).unwrap();
        assert_eq!(detail.note_count, 2);
        assert_eq!(detail.latest.map(|n| n.id), Some(4));
        assert_eq!(detail.days_ago, Some(35));
        assert!(detail.is_overdue);

        assert!(matches!(s.detail(7), Err(RosterError::PlayerNotFound(7))));
    }

    #[test]
    fn test_view_state_selection() {
        let mut state = ViewState::new();
        assert!(!state.is_detail_open());
        state.open(2);
        assert_eq!(state.selected(), Some(2));
        state.close();
        assert!(!state.is_detail_open());
    }

    #[tokio::test]
    async fn test_submit_note_with_zero_latency() {
        let mut s = session(date(2024, 1, 10));
        let note = s.submit_note(1, "Quick feet").await.unwrap();
        assert!(note.is_some());
        assert!(s.submit_note(1, "\n\t").await.unwrap().is_none());
        assert_eq!(s.notes().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_waits_configured_duration() {
        let latency = Latency::from_millis(500);
        let start = tokio::time::Instant::now();
        latency.settle().await;
        assert!(start.elapsed() >= Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_load_builtin_fixtures() {
        let s = Session::load_with_clock(&RosterConfig::instant(), FixedClock(date(2024, 2, 15)))
            .await
            .unwrap();
        assert!(!s.players().is_empty());
        assert_eq!(s.today(), date(2024, 2, 15));
    }
}
