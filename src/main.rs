//! shelfscan - barcode scans to a shelf-sorted shopping list

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = shelfscan::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
