// src/main.rs

use std::process::ExitCode;

use lessbatch::{cli, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("lessbatch error: {err:#}");
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // The chain carries the per-file counts or the pre-flight cause.
            eprintln!("lessbatch error: {err:?}");
            ExitCode::FAILURE
        }
    }
}
