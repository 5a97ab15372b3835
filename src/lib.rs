pub mod cli;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod fixture;
pub mod session;
pub mod warnings;

pub use config::RosterConfig;
pub use engine::{filter_and_sort, is_overdue, last_note_for, FilterMode, Query, SortMode};
pub use error::{Result, RosterError};
pub use session::{Session, ViewState};
