mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Logging is set up inside once flags and config are merged, so `--verbose` applies.
    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("snatch error: {:#}", err);
        std::process::exit(1);
    }
}
