//! Roster-level warnings shown in the summary header.

use crate::engine::RosterView;

/// Something the coach should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Players whose last note is missing or older than the overdue window.
    OverduePlayers { count: usize, total: usize },
    /// Search and status filter hide every player.
    NoPlayersMatch { total: usize },
}

/// Check a roster view and return any warnings.
///
/// # Returns
/// A vector of warnings (empty if everything is up to date)
pub fn check_view(view: &RosterView<'_>) -> Vec<Warning> {
    let mut warnings = Vec::new();

    if view.overdue_count > 0 {
        warnings.push(Warning::OverduePlayers {
            count: view.overdue_count,
            total: view.total_players,
        });
    }

    if view.is_empty() {
        warnings.push(Warning::NoPlayersMatch {
            total: view.total_players,
        });
    }

    warnings
}

/// Format a warning for display.
pub fn format_warning(warning: &Warning) -> String {
    match warning {
        Warning::OverduePlayers { count, total } => {
            format!("{} Overdue ({} of {} players need a note)", count, count, total)
        }
        Warning::NoPlayersMatch { total } => {
            format!(
                "No players found among {} - try adjusting your search or filter criteria",
                total
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PlayerCard;
    use crate::entity::Player;

    fn mock_view(total_players: usize, overdue_count: usize) -> RosterView<'static> {
        RosterView {
            cards: Vec::new(),
            total_players,
            overdue_count,
        }
    }

    #[test]
    fn test_empty_roster_reports_no_players_found() {
        let warnings = check_view(&mock_view(0, 0));
        assert_eq!(warnings, vec![Warning::NoPlayersMatch { total: 0 }]);
    }

    #[test]
    fn test_no_warnings_when_view_has_players_up_to_date() {
        let player = Player::new(1, "Ali", "ST");
        let view = RosterView {
            cards: vec![PlayerCard {
                player: &player,
                last_note: None,
                is_overdue: false,
                days_ago: None,
            }],
            total_players: 1,
            overdue_count: 0,
        };
        assert!(check_view(&view).is_empty());
    }

    #[test]
    fn test_overdue_and_empty_view_warnings() {
        let warnings = check_view(&mock_view(12, 3));
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0], Warning::OverduePlayers { count: 3, total: 12 });
        assert_eq!(warnings[1], Warning::NoPlayersMatch { total: 12 });
    }

    #[test]
    fn test_format_overdue() {
        let msg = format_warning(&Warning::OverduePlayers { count: 3, total: 12 });
        assert!(msg.starts_with("3 Overdue"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn test_format_no_players_match() {
        let msg = format_warning(&Warning::NoPlayersMatch { total: 5 });
        assert!(msg.contains("No players found"));
    }
}
