//! Command Line Interface
//!
//! Flags shared by the terminal surface and the headless subcommands. The
//! subcommands work on the same data directory as the terminal surface and
//! never touch the terminal.
//!
//! ```bash
//! secret-garden                          # open the garden
//! secret-garden export                   # backup to ./secret-garden-backup-<date>.json
//! secret-garden import backup.json       # replace the garden with a backup
//! secret-garden stats --json             # counts as JSON
//! secret-garden list --limit 5           # newest entries first
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use garden_core::{
    export_to_path, format_date, import_from_path, progress, suggested_export_path,
    ConfigOverrides, EntryStore, FileStore, GardenConfig, WritingMode,
};

/// Width of the preview column in `list`
const PREVIEW_CHARS: usize = 60;

/// Secret Garden - a private journal that grows flowers
#[derive(Parser, Debug)]
#[command(name = "secret-garden")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long, env = "GARDEN_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the garden's data
    #[arg(short = 'd', long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Do not save or restore drafts
    #[arg(long)]
    pub no_drafts: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "GARDEN_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Run a headless command instead of opening the garden
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Flag overrides for the loaded configuration
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides::new();
        if let Some(dir) = &self.data_dir {
            overrides = overrides.with_data_dir(dir.clone());
        }
        if self.no_drafts {
            overrides = overrides.with_autosave_drafts(false);
        }
        overrides
    }
}

/// Headless subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Write a backup of every entry and the flower count
    Export {
        /// Destination file (defaults to secret-garden-backup-<date>.json)
        path: Option<PathBuf>,
    },
    /// Replace the garden with a backup
    Import {
        /// Backup file to read
        path: PathBuf,
    },
    /// Show how the garden is growing
    Stats {
        /// Print machine-readable JSON
        #[arg(long)]
        json: bool,
    },
    /// List saved entries, newest first
    List {
        /// Maximum number of entries to show
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },
}

/// Counts reported by `stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GardenStats {
    /// Saved entries
    pub entries: usize,
    /// Flowers grown
    pub flower_count: u64,
    /// Entries per writing mode, keyed by mode name
    pub by_mode: BTreeMap<String, usize>,
    /// Date of the oldest entry
    pub first_entry: Option<String>,
    /// Date of the newest entry
    pub last_entry: Option<String>,
}

impl GardenStats {
    /// Tally the entries in `store`
    pub fn collect(store: &EntryStore) -> Self {
        let entries = store.entries();
        let by_mode = WritingMode::ALL
            .iter()
            .map(|mode| {
                let count = entries.iter().filter(|e| e.mode == *mode).count();
                (mode.as_str().to_string(), count)
            })
            .collect();

        Self {
            entries: entries.len(),
            flower_count: store.flower_count(),
            by_mode,
            first_entry: entries.first().map(|e| e.format_date()),
            last_entry: entries.last().map(|e| format_date(&e.created_at)),
        }
    }
}

/// Open the garden in the configured data directory
fn open_store(config: &GardenConfig) -> EntryStore {
    tracing::debug!(data_dir = %config.data_dir.display(), "Opening garden");
    EntryStore::open(FileStore::new(&config.data_dir))
}

/// Run a headless subcommand, writing its report to `out`
///
/// # Errors
///
/// Returns an error if the backup cannot be written or read, if an import
/// payload is malformed, or if writing the report fails.
pub fn run_command(command: &Command, config: &GardenConfig, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Export { path } => {
            let store = open_store(config);
            let path = path.clone().unwrap_or_else(suggested_export_path);
            export_to_path(&store, &path)
                .with_context(|| format!("Failed to export garden to {}", path.display()))?;
            writeln!(
                out,
                "Exported {} entries to {}",
                store.entries().len(),
                path.display()
            )?;
        }
        Command::Import { path } => {
            let mut store = open_store(config);
            import_from_path(&mut store, path)
                .with_context(|| format!("Failed to import garden from {}", path.display()))?;
            writeln!(
                out,
                "Imported {} entries and {} flowers from {}",
                store.entries().len(),
                store.flower_count(),
                path.display()
            )?;
        }
        Command::Stats { json } => {
            let store = open_store(config);
            let stats = GardenStats::collect(&store);
            if *json {
                serde_json::to_writer_pretty(&mut *out, &stats)?;
                writeln!(out)?;
            } else {
                write_stats(&stats, out)?;
            }
        }
        Command::List { limit } => {
            let store = open_store(config);
            let entries = store.entries();
            if entries.is_empty() {
                writeln!(out, "{}", progress::EMPTY_GARDEN)?;
            }
            for entry in entries.iter().rev().take(*limit) {
                writeln!(
                    out,
                    "{}  {:<20}  {}",
                    entry.format_date(),
                    entry.mode.title(),
                    entry.preview(PREVIEW_CHARS)
                )?;
            }
        }
    }
    Ok(())
}

fn write_stats(stats: &GardenStats, out: &mut impl Write) -> Result<()> {
    writeln!(out, "{}", progress::render(stats.flower_count))?;
    writeln!(out)?;
    writeln!(out, "Entries: {}", stats.entries)?;
    writeln!(out, "Flowers: {}", stats.flower_count)?;
    for mode in WritingMode::ALL {
        let count = stats.by_mode.get(mode.as_str()).copied().unwrap_or(0);
        writeln!(out, "  {:<20} {count}", mode.title())?;
    }
    if let (Some(first), Some(last)) = (&stats.first_entry, &stats.last_entry) {
        writeln!(out, "First entry: {first}")?;
        writeln!(out, "Last entry:  {last}")?;
    }
    Ok(())
}
