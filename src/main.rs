use clap::Parser;
use roster::cli::{handle_list, handle_session, handle_show, handle_summary, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::List {
            search,
            filter,
            sort,
            json,
        } => handle_list(&cli.global, search, filter, sort, json),
        Commands::Show { player_id, json } => handle_show(&cli.global, player_id, json),
        Commands::Summary { json } => handle_summary(&cli.global, json),
        Commands::Session => handle_session(&cli.global),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
