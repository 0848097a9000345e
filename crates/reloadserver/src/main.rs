//! reloadserver binary entry point.
//!
//! Parses arguments, sets up logging and colors, runs the server and turns
//! startup failures into a diagnostic plus a distinct exit status.

use clap::Parser;
use reloadserver::{cli, commands, error, logger, ui};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments (usage errors exit with status 2)
    let args = cli::Cli::parse();

    // Initialize logging and colors based on global flags
    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    match commands::serve_execute(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.exit_code();
            // Convert CLI errors to miette diagnostics for readable reporting
            eprintln!("{:?}", error::cli_error_to_miette(err));
            ExitCode::from(code)
        }
    }
}
