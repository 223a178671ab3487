use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(name = "counter-forge")]
#[command(bin_name = "counter-forge")]
#[command(about = "Run Counter contract scenarios on an ephemeral chain")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the Counter contract schema as JSON.
    Schema(SchemaArgs),
    /// List the accounts of a fresh chain.
    Accounts(ChainOptions),
    /// Deploy a fresh Counter and execute a scenario file against it.
    Run(RunArgs),
    /// Generate shell completion scripts.
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct ChainOptions {
    /// Chain configuration file (TOML). Defaults are used when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub chain: ChainOptions,

    /// Scenario file (TOML) listing the calls to make.
    pub scenario: PathBuf,

    /// Print the final report as JSON on stdout.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_enum)]
    pub shell: Shell,
}
