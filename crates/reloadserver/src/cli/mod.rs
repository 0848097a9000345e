//! Command-line interface definition for reloadserver.
//!
//! Uses clap v4's derive macros. Every server option is optional here so the
//! configuration layer can tell "given on the command line" apart from
//! "left at its default" when merging with the config file and environment.
//!
//! ```text
//! reloadserver [PORT] [-b ADDRESS] [-c CERT] [-w PATTERN...] [-i PATTERN...]
//!              [--skip-built-in-ignores] [--blind] [-D MS]
//! ```

mod validation;

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

pub use validation::parse_glob_pattern;

/// HTTP(S) server with automatic refresh on file changes
#[derive(Parser, Debug, Default)]
#[command(
    name = "reloadserver",
    version,
    about = "HTTP(S) server with automatic refresh on file changes",
    long_about = "Serves the current directory over HTTP(S) and reloads every open page when a\n\
                  watched file changes. Pages are reloaded by a small script injected into\n\
                  HTML responses, which long-polls /api-reloadserver/wait-for-reload.\n\
                  POST to /api-reloadserver/trigger-reload to reload clients by hand."
)]
pub struct Cli {
    /// Specify alternate port [default: 8000]
    #[arg(value_name = "PORT")]
    pub port: Option<u16>,

    /// Specify alternate bind address [default: all interfaces]
    #[arg(short, long, value_name = "ADDRESS")]
    pub bind: Option<IpAddr>,

    /// Specify HTTPS server certificate to use [default: none]
    ///
    /// A PEM file holding the certificate chain. It may also hold the
    /// private key; otherwise pass --key.
    #[arg(short, long, value_name = "FILE")]
    pub certificate: Option<PathBuf>,

    /// Private key for --certificate, when not bundled in the same PEM file
    #[arg(long, value_name = "FILE", requires = "certificate")]
    pub key: Option<PathBuf>,

    /// Directory to serve and watch [default: current directory]
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// File(s) to watch. Accepts multiple values [default: *]
    #[arg(short, long, value_name = "PATTERN", num_args = 1.., value_parser = parse_glob_pattern)]
    pub watch: Option<Vec<String>>,

    /// File(s) to ignore. Accepts multiple values [default: none]
    #[arg(short, long, value_name = "PATTERN", num_args = 1.., value_parser = parse_glob_pattern)]
    pub ignore: Option<Vec<String>>,

    /// Do not use the built-in ignores (dotfiles, node_modules, __pycache__)
    #[arg(long)]
    pub skip_built_in_ignores: bool,

    /// Disable file watching and trigger reloads only by HTTP request.
    /// Overrides --watch and --ignore
    #[arg(long)]
    pub blind: bool,

    /// Minimum time in ms between reloads [default: 500, minimum: 10]
    #[arg(short = 'D', long, value_name = "MS")]
    pub debounce_interval: Option<u64>,

    /// Read settings from this JSON file instead of ./reloadserver.json
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}
