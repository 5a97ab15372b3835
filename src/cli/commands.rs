use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::engine::{FilterMode, SortMode};

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about = "Track coaching notes across a team roster")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file (defaults to ./roster.yaml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Players fixture file (JSON array)
    #[arg(long, global = true, value_name = "PATH")]
    pub players: Option<PathBuf>,

    /// Notes fixture file (JSON array)
    #[arg(long, global = true, value_name = "PATH")]
    pub notes: Option<PathBuf>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<NaiveDate>,

    /// Skip the simulated load and submit delays
    #[arg(long, global = true)]
    pub no_delay: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List players, filtered and sorted
    List {
        /// Case-insensitive match on name or position
        #[arg(long, short = 's', default_value = "")]
        search: String,

        /// Status filter (all, missing-notes, recent-notes)
        #[arg(long, short = 'f', default_value_t = FilterMode::All)]
        filter: FilterMode,

        /// Sort order (name, name-desc, recent-note, oldest-note, position)
        #[arg(long, default_value_t = SortMode::NameAsc)]
        sort: SortMode,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one player with their full notes history
    Show {
        /// Player ID
        player_id: u32,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Roster totals and overdue count
    Summary {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive session reading commands from stdin
    Session,
}
