use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;
use tokio::runtime::Runtime;
use tracing::debug;

use crate::config::RosterConfig;
use crate::engine::{FilterMode, PlayerCard, Query, RosterView, SortMode};
use crate::entity::EntityId;
use crate::error::Result;
use crate::session::{Clock, FixedClock, PlayerDetail, Session, SystemClock, ViewState};
use crate::warnings::{check_view, format_warning, Warning};

use super::commands::GlobalArgs;

const NOTE_PREVIEW_CHARS: usize = 100;

/// Resolve config from file discovery plus command-line overrides.
fn resolve_config(global: &GlobalArgs) -> Result<RosterConfig> {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let mut config = RosterConfig::discover(global.config.as_deref(), &cwd)?;

    if let Some(path) = &global.players {
        config.players_path = Some(path.clone());
    }
    if let Some(path) = &global.notes {
        config.notes_path = Some(path.clone());
    }
    if global.no_delay {
        config.load_delay_ms = 0;
        config.submit_delay_ms = 0;
    }

    Ok(config)
}

fn runtime() -> Result<Runtime> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    Ok(rt)
}

fn open_session(rt: &Runtime, global: &GlobalArgs) -> Result<Session<Box<dyn Clock>>> {
    let config = resolve_config(global)?;
    let clock: Box<dyn Clock> = match global.today {
        Some(date) => Box::new(FixedClock(date)),
        None => Box::new(SystemClock),
    };

    if config.load_delay_ms > 0 {
        eprintln!("Loading roster...");
    }
    rt.block_on(Session::load_with_clock(&config, clock))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

fn format_days_ago(days: i64) -> String {
    if days == 0 {
        "Today".to_string()
    } else {
        format!("{}d ago", days)
    }
}

/// Cut a note down to a one-line preview.
fn preview(text: &str) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > NOTE_PREVIEW_CHARS || text.lines().nth(1).is_some() {
        let cut: String = line.chars().take(NOTE_PREVIEW_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        line.to_string()
    }
}

fn render_card(out: &mut dyn Write, card: &PlayerCard<'_>) -> io::Result<()> {
    let player = card.player;
    let last = match (card.last_note, card.days_ago) {
        (Some(note), Some(days)) => format!("{} ({})", format_date(note.date), format_days_ago(days)),
        _ => "No notes".to_string(),
    };
    let flag = if card.is_overdue { "  OVERDUE" } else { "" };

    writeln!(
        out,
        "  #{:<3} {:<22} {:<4} Age {:<3} {}{}",
        player.jersey_number, player.name, player.position, player.age, last, flag
    )?;
    match card.last_note {
        Some(note) => writeln!(out, "        {}", preview(&note.text)),
        None => writeln!(out, "        No notes available for this player yet."),
    }
}

fn render_view(out: &mut dyn Write, view: &RosterView<'_>, query: &Query) -> io::Result<()> {
    writeln!(out, "Team Roster (Total Players: {})", view.total_players)?;

    let warnings = check_view(view);
    for warning in &warnings {
        if let Warning::OverduePlayers { .. } = warning {
            writeln!(out, "! {}", format_warning(warning))?;
        }
    }

    if query.has_active_filters() {
        writeln!(
            out,
            "Filters: search \"{}\", status {}, sort {}",
            query.search_term, query.filter, query.sort
        )?;
    } else {
        writeln!(out, "Sort: {}", query.sort)?;
    }
    writeln!(
        out,
        "Showing {} of {} players",
        view.showing(),
        view.total_players
    )?;
    writeln!(out)?;

    for warning in &warnings {
        if let Warning::NoPlayersMatch { .. } = warning {
            writeln!(out, "{}", format_warning(warning))?;
        }
    }
    for card in &view.cards {
        render_card(out, card)?;
    }

    Ok(())
}

fn render_detail(out: &mut dyn Write, detail: &PlayerDetail<'_>) -> io::Result<()> {
    let player = detail.player;
    writeln!(
        out,
        "#{} {}  {}  Age {}",
        player.jersey_number, player.name, player.position, player.age
    )?;
    match detail.days_ago {
        Some(days) if detail.is_overdue => writeln!(out, "Last note {} - OVERDUE", format_days_ago(days))?,
        Some(days) => writeln!(out, "Last note {}", format_days_ago(days))?,
        None => writeln!(out, "No notes - OVERDUE")?,
    }
    writeln!(out)?;
    writeln!(out, "Notes History ({} notes)", detail.note_count)?;

    if detail.notes.is_empty() {
        writeln!(out, "  No notes yet. Start by adding the first note for this player.")?;
        return Ok(());
    }

    for (index, note) in detail.notes.iter().enumerate() {
        let latest = if index == 0 { "  [Latest]" } else { "" };
        writeln!(out, "  {}{}", note.date.format("%a, %b %-d, %Y"), latest)?;
        for line in note.text.lines() {
            writeln!(out, "    {}", line)?;
        }
        writeln!(out, "    by {}", note.author)?;
    }

    Ok(())
}

pub fn handle_list(
    global: &GlobalArgs,
    search: String,
    filter: FilterMode,
    sort: SortMode,
    json: bool,
) -> Result<()> {
    let rt = runtime()?;
    let session = open_session(&rt, global)?;

    let query = Query::new().with_search(search).with_filter(filter).with_sort(sort);
    debug!(?query, "listing roster");
    let view = session.view(&query);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        let stdout = io::stdout();
        render_view(&mut stdout.lock(), &view, &query)?;
    }

    Ok(())
}

pub fn handle_show(global: &GlobalArgs, player_id: EntityId, json: bool) -> Result<()> {
    let rt = runtime()?;
    let session = open_session(&rt, global)?;
    let detail = session.detail(player_id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        let stdout = io::stdout();
        render_detail(&mut stdout.lock(), &detail)?;
    }

    Ok(())
}

pub fn handle_summary(global: &GlobalArgs, json: bool) -> Result<()> {
    let rt = runtime()?;
    let session = open_session(&rt, global)?;
    let policy = session.policy();

    if json {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct SummaryJson {
            today: NaiveDate,
            total_players: usize,
            total_notes: usize,
            overdue_count: usize,
            overdue_after_days: i64,
        }

        let summary = SummaryJson {
            today: policy.today,
            total_players: session.players().len(),
            total_notes: session.notes().len(),
            overdue_count: session.overdue_count(),
            overdue_after_days: policy.after_days,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Team Roster as of {}", format_date(policy.today));
        println!("  Total Players: {}", session.players().len());
        println!("  Notes:         {}", session.notes().len());
        println!(
            "  Overdue:       {} (no note in {}+ days)",
            session.overdue_count(),
            policy.after_days
        );
    }

    Ok(())
}

pub fn handle_session(global: &GlobalArgs) -> Result<()> {
    let rt = runtime()?;
    let mut session = open_session(&rt, global)?;

    let stdin = io::stdin();
    let interactive = atty::is(atty::Stream::Stdin);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if interactive {
        writeln!(out, "Type 'help' for commands.")?;
    }
    run_session(&rt, &mut session, stdin.lock(), &mut out, interactive)
}

const SESSION_HELP: &str = "\
Commands:
  list              Show the roster for the current query
  search <term>     Match name or position (empty term clears it)
  filter <mode>     all | missing-notes | recent-notes
  sort <mode>       name | name-desc | recent-note | oldest-note | position
  clear             Reset search and filter (sort is kept)
  open <id>         Show a player's notes history
  close             Close the notes history
  note <text>       Add a note to the open player
  quit              End the session";

/// Drive a session from line-oriented commands. Notes added here are kept
/// only for the lifetime of `session`.
pub fn run_session<C: Clock, R: BufRead>(
    rt: &Runtime,
    session: &mut Session<C>,
    input: R,
    out: &mut dyn Write,
    prompt: bool,
) -> Result<()> {
    let mut state = ViewState::new();

    if prompt {
        write!(out, "> ")?;
        out.flush()?;
    }

    for line in input.lines() {
        let line = line?;
        let line = line.trim_start();
        let (command, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        match command.trim_end() {
            "" => {}
            "quit" | "exit" => break,
            "help" => writeln!(out, "{}", SESSION_HELP)?,
            "list" => render_view(out, &session.view(&state.query), &state.query)?,
            "search" => {
                state.query.search_term = arg.to_string();
                render_view(out, &session.view(&state.query), &state.query)?;
            }
            "filter" => match arg.parse::<FilterMode>() {
                Ok(filter) => {
                    state.query.filter = filter;
                    render_view(out, &session.view(&state.query), &state.query)?;
                }
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            "sort" => match arg.parse::<SortMode>() {
                Ok(sort) => {
                    state.query.sort = sort;
                    render_view(out, &session.view(&state.query), &state.query)?;
                }
                Err(e) => writeln!(out, "Error: {}", e)?,
            },
            "clear" => {
                state.query.clear_filters();
                render_view(out, &session.view(&state.query), &state.query)?;
            }
            "open" => match arg.trim().parse::<EntityId>() {
                Ok(id) => match session.detail(id) {
                    Ok(detail) => {
                        render_detail(out, &detail)?;
                        state.open(id);
                    }
                    Err(e) => writeln!(out, "Error: {}", e)?,
                },
                Err(_) => writeln!(out, "Error: invalid player id '{}'", arg.trim())?,
            },
            "close" => state.close(),
            "note" => match state.selected() {
                Some(id) => {
                    if let Some(note) = rt.block_on(session.submit_note(id, arg))? {
                        writeln!(out, "Added note {} on {}", note.id, format_date(note.date))?;
                        render_detail(out, &session.detail(id)?)?;
                    }
                }
                None => writeln!(out, "Error: open a player before adding a note")?,
            },
            other => writeln!(out, "Unknown command '{}'. Type 'help' for commands.", other)?,
        }

        if prompt {
            write!(out, "> ")?;
            out.flush()?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Note, Player};
    use crate::fixture::Fixtures;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn session() -> Session<FixedClock> {
        let mut smith = Player::new(1, "Smith", "ST");
        smith.jersey_number = 9;
        let fixtures = Fixtures {
            players: vec![smith, Player::new(2, "Jones", "GK")],
            notes: vec![Note::new(1, 1, date(2024, 1, 1), "Good hold-up play", "Coach Ahmed")],
        };
        Session::from_fixtures(fixtures, &RosterConfig::instant(), FixedClock(date(2024, 1, 20)))
    }

    fn run(script: &str) -> (String, Session<FixedClock>) {
        let rt = runtime().unwrap();
        let mut s = session();
        let mut out = Vec::new();
        run_session(&rt, &mut s, script.as_bytes(), &mut out, false).unwrap();
        (String::from_utf8(out).unwrap(), s)
    }

    #[test]
    fn test_format_days_ago() {
        assert_eq!(format_days_ago(0), "Today");
        assert_eq!(format_days_ago(19), "19d ago");
    }

    #[test]
    fn test_preview_truncates_long_notes() {
        assert_eq!(preview("short"), "short");
        let long = "x".repeat(150);
        let p = preview(&long);
        assert!(p.ends_with("..."));
        assert_eq!(p.chars().count(), NOTE_PREVIEW_CHARS + 3);
    }

    #[test]
    fn test_render_view_lists_cards() {
        let s = session();
        let query = Query::new();
        let mut out = Vec::new();
        render_view(&mut out, &s.view(&query), &query).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Total Players: 2"));
        assert!(text.contains("1 Overdue"));
        assert!(text.contains("Showing 2 of 2 players"));
        assert!(text.contains("Jan 1, 2024 (19d ago)"));
        assert!(text.find("Jones").unwrap() < text.find("Smith").unwrap());
    }

    #[test]
    fn test_session_search_and_clear() {
        let (out, _) = run("search mi\nclear\nquit\n");
        assert!(out.contains("Filters: search \"mi\""));
        assert!(out.contains("Showing 1 of 2 players"));
        assert!(out.contains("Showing 2 of 2 players"));
    }

    #[test]
    fn test_session_add_note_to_open_player() {
        let (out, s) = run("open 2\nnote   Commanding box presence  \nnote    \n");
        assert!(out.contains("No notes yet"));
        assert!(out.contains("Added note 2 on Jan 20, 2024"));
        assert!(out.contains("[Latest]"));
        assert_eq!(s.notes().len(), 2);
        assert_eq!(s.notes()[1].text, "Commanding box presence");
    }

    #[test]
    fn test_session_note_without_open_player() {
        let (out, s) = run("note hello\n");
        assert!(out.contains("open a player before adding a note"));
        assert_eq!(s.notes().len(), 1);
    }

    #[test]
    fn test_session_reports_bad_input() {
        let (out, _) = run("filter stale\nopen abc\nopen 99\nfrobnicate\n");
        assert!(out.contains("Invalid filter mode: stale"));
        assert!(out.contains("invalid player id 'abc'"));
        assert!(out.contains("Player not found: 99"));
        assert!(out.contains("Unknown command 'frobnicate'"));
    }
}
