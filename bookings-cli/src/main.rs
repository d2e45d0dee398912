//! Main entry point for the bookings CLI.
//!
//! Each guest-workflow command runs one step and stores the result in the
//! session table, so a booking spans several invocations sharing a
//! `--session` token.

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::{Cli, Command};
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = bookings::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        Command::Init(cmd) => cmd.execute(&global),
        Command::Rooms(cmd) => cmd.execute(&global),
        Command::Check(cmd) => cmd.execute(&global),
        Command::Search(cmd) => cmd.execute(&global),
        Command::Select(cmd) => cmd.execute(&global),
        Command::BookRoom(cmd) => cmd.execute(&global),
        Command::Details(cmd) => cmd.execute(&global),
        Command::Confirm(cmd) => cmd.execute(&global),
        Command::Cancel(cmd) => cmd.execute(&global),
        Command::Status(cmd) => cmd.execute(&global),
        Command::Block(cmd) => cmd.execute(&global),
        Command::Show(cmd) => cmd.execute(&global),
        Command::SweepSessions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
