//! Loadout - named sets of environment variables, encrypted with sops.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use loadout::cli::output;
use loadout::cli::{execute, Cli};

fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout is reserved for `eval`-able output.
    let filter = EnvFilter::try_from_env("LOADOUT_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("loadout=debug")
        } else {
            EnvFilter::new("loadout=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.dir) {
        output::error(&e.to_string());
        if let Some(hint) = e.hint() {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}
