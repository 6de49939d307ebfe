//! Drill CLI
//!
//! Command-line interface for building and inspecting item tables.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;

use drill_core::{
    Bank, DEFAULT_INITIAL_UNLOCK, ItemStore, MasteryLevel, Scheduler, StoreStats, open_storage,
};
use drill_server::options::{DataArgs, SchedulerArgs};

/// Drill - adaptive question scheduler CLI
#[derive(Parser)]
#[command(name = "drill")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Manage item tables for the adaptive drill server")]
struct Cli {
    #[command(flatten)]
    data: DataArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a JSON question bank, keeping progress on known questions
    Import {
        /// Path to a JSON array of {question, answer} objects
        bank: PathBuf,
        /// Also drill every pair in the answer-to-question direction
        #[arg(long)]
        reverse: bool,
        /// Items in play when the table is created
        #[arg(long, default_value_t = DEFAULT_INITIAL_UNLOCK)]
        initial_unlock: usize,
    },

    /// Show item table statistics
    Stats {
        #[command(flatten)]
        scheduler: SchedulerArgs,
    },

    /// Validate configuration and item table
    Check {
        #[command(flatten)]
        scheduler: SchedulerArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Import {
            bank,
            reverse,
            initial_unlock,
        } => run_import(&cli.data, bank, reverse, initial_unlock),
        Commands::Stats { scheduler } => run_stats(&cli.data, &scheduler),
        Commands::Check { scheduler } => run_check(&cli.data, &scheduler),
    }
}

/// Import a question bank
fn run_import(data: &DataArgs, bank_path: PathBuf, reverse: bool, initial_unlock: usize) -> anyhow::Result<()> {
    let mut bank = Bank::from_path(&bank_path)?;
    if reverse {
        bank = bank.bidirectional()?;
    }

    let table = data.table_path()?;
    // Check before opening: the SQLite backend creates its file on open
    let existed = table.exists();
    let storage = open_storage(&table)?;
    let existing = if existed { storage.load()? } else { ItemStore::new() };

    println!("{}", "=== Drill Import ===".cyan().bold());
    println!();
    println!("{}: {}", "Bank".white().bold(), bank_path.display());
    println!("{}: {}", "Entries".white().bold(), bank.len());
    println!("{}: {}", "Table".white().bold(), storage.describe());

    let store = if existing.is_empty() {
        let store = bank.into_store(initial_unlock)?;
        println!(
            "{}: {} items, {} in play",
            "Created".green().bold(),
            store.len(),
            store.active_count()
        );
        store
    } else {
        let mut store = existing;
        let added = store.merge_bank(&bank)?;
        if added.is_empty() {
            println!("{}", "No new questions; table unchanged.".dimmed());
            return Ok(());
        }
        println!(
            "{}: {} new items ({} total, {} in play)",
            "Merged".green().bold(),
            added.len(),
            store.len(),
            store.active_count()
        );
        store
    };

    storage.save(&store)?;
    Ok(())
}

/// Show item table statistics
fn run_stats(data: &DataArgs, args: &SchedulerArgs) -> anyhow::Result<()> {
    let table = data.table_path()?;
    let storage = open_storage(&table)?;
    let store = storage.load()?;
    let stats = store.stats(args.required_streak);

    println!("{}", "=== Drill Statistics ===".cyan().bold());
    println!();
    println!("{}: {}", "Table".white().bold(), storage.describe());
    println!("{}: {}", "Total Items".white().bold(), stats.total);
    println!(
        "{}: {} ({:.1}% of table)",
        "Active Pool".white().bold(),
        stats.active,
        stats.active_ratio() * 100.0
    );
    println!(
        "{}: {} ({:.1}% of pool)",
        "Mastered".white().bold(),
        stats.mastered_active,
        stats.mastered_ratio() * 100.0
    );

    println!();
    println!("{}", "=== Mastery Levels ===".yellow().bold());
    for (level, color) in [
        (MasteryLevel::Graduated, "green"),
        (MasteryLevel::Mastering, "yellow"),
        (MasteryLevel::Struggling, "red"),
    ] {
        let count = store
            .iter()
            .filter(|i| i.mask && i.level(args.required_streak) == level)
            .count();
        print_distribution_bar(level.as_str(), count, stats.active, color);
    }

    println!();
    println!("{}", "=== Streak Distribution ===".yellow().bold());
    print_levels(&stats, args.required_streak);

    let struggling: Vec<_> = store
        .iter()
        .filter(|i| i.mask && !i.is_mastered(args.required_streak))
        .collect();
    if !struggling.is_empty() {
        println!();
        println!("{}", "=== Still Learning ===".magenta().bold());
        for item in struggling {
            println!("  {:20} {}", item.question, item.consec.to_string().dimmed());
        }
    }

    Ok(())
}

fn print_levels(stats: &StoreStats, required_streak: u32) {
    if stats.levels.is_empty() {
        println!("{}", "No active items.".dimmed());
        return;
    }
    for (consec, count) in stats.levels.iter().rev() {
        let color = if *consec >= required_streak {
            "green"
        } else if *consec > 0 {
            "yellow"
        } else {
            "red"
        };
        print_distribution_bar(&format!("streak {}", consec), *count, stats.active, color);
    }
}

fn print_distribution_bar(label: &str, count: usize, total: usize, color: &str) {
    let percentage = if total > 0 {
        (count as f64 / total as f64) * 100.0
    } else {
        0.0
    };

    let bar_width: usize = 30;
    let filled = ((percentage / 100.0) * bar_width as f64) as usize;
    let empty = bar_width.saturating_sub(filled);

    let bar = format!("{}{}", "#".repeat(filled), "-".repeat(empty));
    let colored_bar = match color {
        "green" => bar.green(),
        "yellow" => bar.yellow(),
        "red" => bar.red(),
        _ => bar.white(),
    };

    println!(
        "  {:15} [{:30}] {:>4} ({:>5.1}%)",
        label, colored_bar, count, percentage
    );
}

/// Validate configuration and item table
fn run_check(data: &DataArgs, args: &SchedulerArgs) -> anyhow::Result<()> {
    println!("{}", "=== Drill Check ===".cyan().bold());
    println!();

    let scheduler = match Scheduler::new(args.to_config()) {
        Ok(s) => {
            println!("{}: {}", "Configuration".white().bold(), "OK".green().bold());
            s
        }
        Err(e) => {
            println!("{}: {}", "Configuration".white().bold(), "INVALID".red().bold());
            println!("  {}", e);
            anyhow::bail!("invalid configuration");
        }
    };

    let table = data.table_path()?;
    if !table.exists() {
        println!("{}: {}", "Item Table".white().bold(), "MISSING".red().bold());
        println!("  {}", table.display());
        anyhow::bail!("no item table at {}", table.display());
    }
    let storage = open_storage(&table)?;
    let store = match storage.load() {
        Ok(store) => {
            println!("{}: {}", "Item Table".white().bold(), "OK".green().bold());
            store
        }
        Err(e) => {
            println!("{}: {}", "Item Table".white().bold(), "CORRUPT".red().bold());
            println!("  {}", e);
            return Err(e.into());
        }
    };

    let mut warnings = Vec::new();
    if store.is_empty() {
        warnings.push("Item table is empty - import a question bank".to_string());
    } else if store.active_count() == 0 {
        warnings.push("No items are in play - draws will fail".to_string());
    }
    if let Some(rollback) = &scheduler.config().rollback {
        if store.active_count() < rollback.mask_min {
            warnings.push(format!(
                "Active pool ({}) is below the rollback floor ({})",
                store.active_count(),
                rollback.mask_min
            ));
        }
    }

    if warnings.is_empty() {
        println!();
        println!("{}", "All checks passed.".green());
    } else {
        println!();
        println!("{}", "Warnings:".yellow().bold());
        for warning in &warnings {
            println!("  {} {}", "!".yellow().bold(), warning);
        }
    }

    Ok(())
}
