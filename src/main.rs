use std::process::ExitCode;

use clap::Parser;

use artstrip::{Args, run_with_log_level};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let mut stdout = std::io::stdout();
    let log_level = args.log_level();

    match run_with_log_level(args.into_command(), &mut stdout, log_level).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::from(1)
        }
    }
}
