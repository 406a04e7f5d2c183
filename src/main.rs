mod cli;
mod commands;
mod config;
mod executor;
mod system;
mod utils;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use system::HostSnapshot;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }
    let color = !cli.no_color;

    let host = HostSnapshot::capture();
    log::debug!("{:?}", host);

    match cli.command {
        None => {
            commands::info::run(&host, false, color)?;
        }
        Some(Command::Info { json }) => {
            commands::info::run(&host, json, color)?;
        }
        Some(Command::Run(args)) => {
            commands::run::run(cli.config.as_deref(), &args)?;
        }
        Some(Command::Apply { dry_run, batch }) => {
            commands::apply::run(
                cli.config.as_deref(),
                &host,
                dry_run,
                batch.as_deref(),
                color,
            )?;
        }
        Some(Command::System) => commands::report::system(color),
        Some(Command::Cpu) => commands::report::cpu(color),
        Some(Command::Memory) => commands::report::memory(color),
        Some(Command::Swap) => commands::report::swap(color),
        Some(Command::Disk { all, sort, total }) => {
            commands::report::disk(all, sort, total, color);
        }
    }

    Ok(())
}
