mod app;
mod cli;
mod clock;
mod commands;
mod config;
mod deck;
mod loader;
mod logging;
mod render;
mod resources;
mod theme;
mod transition;
mod widget;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, UsageError};

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and --version print to stdout and exit 0; everything else
            // is a usage error.
            if !e.use_stderr() {
                e.exit();
            }
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init(cli.verbose, cli.quiet, cli.no_color);

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        if let Some(UsageError::MissingInput) = e.downcast_ref::<UsageError>() {
            eprintln!("Usage: slidedeck <deck directory or .kv file>");
        }
        std::process::exit(1);
    }
}
