// src/main.rs

use std::process::ExitCode;

use plandag::{cli, logging, run};

fn main() -> ExitCode {
    let args = cli::parse();
    let outcome = logging::init_logging(args.log_level).and_then(|()| run(args));

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("plandag error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
