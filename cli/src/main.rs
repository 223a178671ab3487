mod cli;
mod commands;
mod error;
mod scenario;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(err) = run() {
        ui::error(err.to_string());
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Schema(args) => commands::schema::run(args),
        Commands::Accounts(args) => commands::accounts::run(args),
        Commands::Run(args) => commands::run::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
