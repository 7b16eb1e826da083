//! confstore - read and edit INI, JSON and XML configuration files

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = confstore::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
