mod cmd;
mod core;

use clap::{Parser, Subcommand};
use cmd::{allowance::AllowanceCommand, limits::LimitsCommand, schema::SchemaCommand};

#[derive(Parser, Debug)]
#[command(name = "isac", version, about = "Calculate UK ISA subscription allowances")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Annual and remaining allowance for a client's accounts
    Allowance(AllowanceCommand),
    /// Subscription limits per tax year
    Limits(LimitsCommand),
    /// Print JSON schema for the input formats
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Allowance(cmd) => cmd.exec(),
        Command::Limits(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
