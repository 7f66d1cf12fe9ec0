//! tagconf - inspect and edit typed config files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = tagconf::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
