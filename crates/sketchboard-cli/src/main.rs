//! Replay a board script and print the resulting state as JSON.

use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        eprintln!("Usage: sketchboard <script.json>");
        return ExitCode::FAILURE;
    };

    let report = sketchboard_cli::Script::load(&path)
        .and_then(|script| sketchboard_cli::run_script(&script));
    let report = match report {
        Ok(report) => report,
        Err(err) => {
            log::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            log::error!("Failed to encode report: {err}");
            ExitCode::FAILURE
        }
    }
}
