use anyhow::{Context, Result};
use arbor_tree::Language;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Language description (defaults to the built-in JSON language)
    pub config: Option<PathBuf>,

    /// Also list hotkeys and styles
    #[arg(short, long)]
    pub metadata: bool,
}

/// Compile a language description and print its type table
pub fn check(args: CheckArgs) -> Result<()> {
    let language = match &args.config {
        Some(path) => Language::load(path)
            .with_context(|| format!("Invalid language description {}", path.display()))?,
        None => arbor_json::language().context("Built-in JSON language is invalid")?,
    };

    let table = language.table();
    println!(
        "{} language `{}` ({} types)",
        "✓".green(),
        language.name().bold(),
        table.len()
    );
    print!("{}", table);

    if args.metadata {
        println!();
        for desc in table.iter() {
            if desc.meta.hotkey.is_none() && desc.meta.style.is_none() {
                continue;
            }
            println!(
                "   {:<12} hotkey {:<4} style {}",
                desc.name,
                desc.meta.hotkey.as_deref().unwrap_or("-").cyan(),
                desc.meta.style.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}
