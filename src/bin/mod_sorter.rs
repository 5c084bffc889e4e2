//! mod-sorter CLI
//!
//! Thin front-end over the mod_sorter library: resolves the game directory,
//! loads configuration, runs one sort and reports where the archives went.

// Exclude from coverage - CLI binary tested via integration tests
#![cfg_attr(tarpaulin, ignore)]

use anyhow::{Context, Result};
use clap::Parser;
use mod_sorter::{Category, FsModHost, ModSorter, SortResult, SorterConfig};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Sort installed mods into client, server and universal zip sets.
#[derive(Parser, Debug)]
#[command(name = "mod-sorter")]
#[command(version = mod_sorter::VERSION)]
#[command(about = "Sort installed mods into client/server/both zip archives")]
#[command(after_help = "EXAMPLES:
  # Sort the mods of the default game directory
  mod-sorter

  # Sort a specific instance and print the result as JSON
  mod-sorter ~/instances/survival --json
")]
struct Cli {
    /// Game directory containing the mods folder (default: platform game directory)
    #[arg(value_name = "GAME_DIR")]
    game_dir: Option<PathBuf>,

    /// Config file path (default: GAME_DIR/.mod_sorter_config.json)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long = "json")]
    json: bool,

    /// Only log warnings and errors
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    quiet: bool,

    /// Log every skipped mod and archive entry
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Platform default game directory, if it exists
fn default_game_dir() -> Option<PathBuf> {
    let dir = if cfg!(target_os = "windows") {
        dirs::config_dir().map(|d| d.join(".minecraft"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir().map(|d| d.join("minecraft"))
    } else {
        dirs::home_dir().map(|d| d.join(".minecraft"))
    };
    dir.filter(|d| d.is_dir())
}

/// Path relative to `base` when possible, the full path otherwise
fn format_relative(base: &Path, target: &Path) -> String {
    target
        .strip_prefix(base)
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| target.display().to_string())
}

fn print_summary(result: &SortResult, game_dir: &Path) {
    println!(
        "Created mod zip sets in {}",
        format_relative(game_dir, result.output_dir())
    );
    println!("Mods analyzed: {}", result.total_items());
    for category in Category::ALL {
        let location = format_relative(game_dir, result.archive_path(category));
        println!("{}: {} -> {}", category.label(), result.count(category), location);
    }
}

fn run(cli: Cli) -> Result<()> {
    let game_dir = match cli.game_dir {
        Some(dir) => dir,
        None => match default_game_dir() {
            Some(dir) => dir,
            None => std::env::current_dir().context("resolving current directory")?,
        },
    };

    let config = match &cli.config {
        Some(path) => SorterConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SorterConfig::discover(&game_dir)?,
    };

    let host = FsModHost::new(&game_dir, &config);
    let result = ModSorter::with_config(host, config).sort()?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&result, &game_dir);
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || cli.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("Failed to sort mods: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
