//! Scene replay entry point.

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Starting NodeSnap replay");

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: nodesnap <scene.json>");
        return ExitCode::from(2);
    };

    match nodesnap_cli::run(&path) {
        Ok(output) => {
            print!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Replay of {} failed: {}", path, e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
