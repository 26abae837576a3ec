mod commands;
mod html;

use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use commands::{check, edit, render, CheckArgs, EditArgs, RenderArgs};
use tracing_subscriber::EnvFilter;

/// arbor - structure editor for typed syntax trees
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile a language description and print its types
    Check(CheckArgs),

    /// Parse a JSON file and render it through the language templates
    Render(RenderArgs),

    /// Apply editing commands to a JSON file and print the result
    Edit(EditArgs),
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Check(args) => check(args),
        Command::Render(args) => render(args),
        Command::Edit(args) => edit(args),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
