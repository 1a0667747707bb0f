//! rollcall: inspect captured schedule responses from the command line.
//!
//! Reads one backend response body from a file or stdin, normalizes it with
//! `rollcall-core`, and prints the requested view as JSON.
//!
//! ## Subcommands
//!
//! - `normalize`: Full normalized schedule
//! - `today` / `upcoming`: Dashboard windows relative to `--now`
//! - `on`: Sessions on one calendar date
//! - `month`: Monday-first calendar grid with per-day counts
//! - `show`: One session plus its attendance endpoints

mod commands;
mod logging;

use clap::Parser;
use std::io;
use std::path::PathBuf;

use commands::{Command, Context};

#[derive(Parser)]
#[command(name = "rollcall")]
#[command(about = "Rollcall schedule normalizer")]
#[command(version)]
struct Cli {
    /// Engine config file (defaults to <config dir>/rollcall/engine.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Response body to read; stdin when omitted
    #[arg(long, short, global = true, value_name = "PATH")]
    input: Option<PathBuf>,

    /// HTTP status the response was served with
    #[arg(long, global = true, default_value_t = 200)]
    status: u16,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let _logging_guard = logging::init();
    let cli = Cli::parse();

    let result = Context::load(cli.config, cli.input.as_deref(), cli.status)
        .and_then(|context| commands::execute(&context, &cli.command))
        .and_then(|output| commands::emit(io::stdout().lock(), &output));

    if let Err(e) = result {
        tracing::error!(error = %e, "rollcall failed");
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
