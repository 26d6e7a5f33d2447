use clap::Parser;
use std::io::{self, IsTerminal};
use tracklet::cli::{Cli, Commands, commands};
use tracklet::config::CliOverrides;
use tracklet::TrackletError;
use tracklet::logging::init_logging;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {e}");
        // Continue without logging rather than refusing to run
    }

    let overrides = CliOverrides {
        db: cli.db.clone(),
        actor: cli.actor.clone(),
        lock_timeout: cli.lock_timeout,
    };

    let result = match cli.command {
        Commands::Init { force } => commands::init::execute(force, cli.json),
        Commands::Seed => commands::seed::execute(cli.json, &overrides),
        Commands::Serve => commands::serve::execute(&overrides),
        Commands::Call { method, params } => {
            commands::call::execute(&method, params.as_deref(), &overrides)
        }
        Commands::Schema => commands::schema::execute(),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Report errors and exit.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to
/// stderr. Otherwise, outputs the message plus a suggestion when one exists.
fn handle_error(err: &TrackletError, json_mode: bool) -> ! {
    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let payload = serde_json::json!({
            "error": {
                "code": err.code().as_str(),
                "message": err.to_string(),
                "recoverable": err.is_user_recoverable(),
                "suggestion": err.suggestion(),
            }
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
        );
    } else {
        eprintln!("Error: {err}");
        if let Some(suggestion) = err.suggestion() {
            eprintln!("  {suggestion}");
        }
    }

    std::process::exit(err.exit_code());
}
