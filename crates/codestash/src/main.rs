//! codestash CLI - back up project directories with smart file selection
//!
//! This is the main entry point for the codestash command-line interface.

mod cli;
mod commands;
mod help;
mod output;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    if cli.help_detailed {
        help::print_detailed();
        return;
    }

    if let Err(e) = run(&cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    init_tracing(cli)?;

    if cli.list_profiles {
        commands::profile::list(cli)
    } else if cli.create_default_profile {
        commands::profile::create_default(cli)
    } else if cli.restore.is_some() {
        commands::restore::run(cli)
    } else {
        commands::backup::run(cli)
    }
}

/// Initialize tracing: a console layer at the selected level, plus an
/// optional detailed file layer for --log-file.
fn init_tracing(cli: &Cli) -> Result<()> {
    let filter = if cli.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::new(cli.log_level.as_filter())
    };

    let console_layer = fmt::layer().with_target(false);

    if let Some(path) = &cli.log_file {
        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path)?;
        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(std::sync::Arc::new(file));

        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .with(filter)
            .init();
    }

    Ok(())
}
