mod commands;
mod handlers;

pub use commands::{Cli, Commands, GlobalArgs};
pub use handlers::{handle_list, handle_session, handle_show, handle_summary, run_session};
