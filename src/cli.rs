use crate::system::DiskSort;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bootkit")]
#[command(author, version, about, long_about = None)]
#[command(about = "Installer bootstrap: inspect the host and run checked commands")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable color
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Without a subcommand, print the host snapshot
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print host information (os, arch, shell, home)
    Info {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run one command, or several with --multi
    Run(RunArgs),

    /// Run the batches from the config file in dependency order
    Apply {
        /// Only show what would be done, don't run anything
        #[arg(long)]
        dry_run: bool,

        /// Run only this batch (and the batches it depends on)
        batch: Option<String>,
    },

    /// Print OS name, kernel, OS version and host name
    System,

    /// Print CPU usage and per-core details
    Cpu,

    /// Print RAM usage
    Memory,

    /// Print swap usage
    Swap,

    /// Print a table of mounted disks
    Disk {
        /// Also show file system, kind and removable columns
        #[arg(short, long)]
        all: bool,

        /// Order rows by this column
        #[arg(short, long, value_enum, value_name = "COLUMN")]
        sort: Option<DiskSort>,

        /// Append a row summing every disk
        #[arg(short, long)]
        total: bool,
    },
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run every COMMAND in order, continuing past failures
    #[arg(short, long)]
    pub multi: bool,

    /// Launch COMMAND... as one program plus arguments, without a shell
    #[arg(long, conflicts_with = "multi")]
    pub argv: bool,

    /// Accept any exit code as success
    #[arg(long)]
    pub no_check: bool,

    /// Shell interpreter for command lines (default: config or /bin/sh)
    #[arg(long, value_name = "PATH")]
    pub shell: Option<PathBuf>,

    /// Working directory for the commands
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Extra environment variable, repeatable
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,

    /// Don't connect stdin to the commands
    #[arg(long)]
    pub no_stdin: bool,

    /// Collect output and print it after each command
    #[arg(long, conflicts_with = "quiet")]
    pub capture: bool,

    /// Discard command output
    #[arg(short, long)]
    pub quiet: bool,

    /// Write command stdout to FILE
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Command line(s), or program and arguments with --argv
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub commands: Vec<String>,
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
