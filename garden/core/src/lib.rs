//! Garden Core - Headless Journaling Engine for Secret Garden
//!
//! This crate holds everything the journal does, independent of how it is
//! shown. A terminal surface (or a test) feeds it [`GardenEvent`]s and renders
//! the [`GardenMessage`]s it sends back.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Surface (TUI)                        │
//! │   key bindings ──▶ GardenEvent      GardenMessage ──▶ view │
//! └────────────────────────┬─────────────────────────────────┘
//!                          │
//! ┌────────────────────────┼─────────────────────────────────┐
//! │                   GARDEN CORE                             │
//! │  ┌─────────────────────┴──────────────────────────────┐  │
//! │  │                 GardenController                    │  │
//! │  │  ┌──────────┐ ┌──────────┐ ┌────────┐ ┌──────────┐ │  │
//! │  │  │ Session  │ │  Entry   │ │ Timers │ │  Penny   │ │  │
//! │  │  │  State   │ │  Store   │ │        │ │  Picker  │ │  │
//! │  │  └──────────┘ └────┬─────┘ └────────┘ └──────────┘ │  │
//! │  └────────────────────┼───────────────────────────────┘  │
//! │                       ▼                                  │
//! │               KeyValueStore (files)                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```ignore
//! use garden_core::{EntryStore, FileStore, GardenController, GardenEvent, load_config};
//! use tokio::sync::mpsc;
//!
//! let config = load_config()?;
//! let store = EntryStore::open(FileStore::new(&config.data_dir));
//! let (tx, mut rx) = mpsc::unbounded_channel();
//! let mut controller = GardenController::new(config, store, tx);
//! controller.connect();
//!
//! loop {
//!     controller.tick(std::time::Instant::now());
//!     while let Ok(msg) = rx.try_recv() {
//!         // Render message
//!     }
//!     // Translate input into GardenEvent and call handle_event
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`controller`]: Session state machine (vault, garden, journal)
//! - [`store`]: Entry store and the key-value substrate beneath it
//! - [`entry`]: Journal entries, writing modes, and ids
//! - [`prompts`]: Guided and penny prompt catalogs
//! - [`penny`]: Randomized prompt picker
//! - [`progress`]: Flower progress line
//! - [`timers`]: Deadline queue for transient feedback and debouncing
//! - [`archive`]: Export and import through files
//! - [`events`]: Events from a surface to the controller
//! - [`messages`]: Messages from the controller to a surface
//! - [`config`]: TOML and environment configuration
//! - [`error`]: Error types
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![warn(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod config;
pub mod controller;
pub mod entry;
pub mod error;
pub mod events;
pub mod messages;
pub mod penny;
pub mod progress;
pub mod prompts;
pub mod store;
pub mod timers;

// Re-exports for convenience
pub use archive::{default_export_file_name, export_to_path, import_from_path, ArchiveError};
pub use controller::{
    suggested_export_path, GardenController, Screen, SessionState, VAULT_ERROR_TEXT,
};
pub use entry::{format_date, EntryId, EntryIdGenerator, JournalEntry, WritingMode};
pub use error::GardenError;
pub use events::{BufferEdit, GardenEvent};
pub use messages::{
    BufferTarget, GardenMessage, NotifyLevel, SaveFeedbackKind, TransferKind, TransferOutcome,
};
pub use penny::{PennyDisplay, PennyOutcome, PennyResult};
pub use store::kv::{FileStore, KeyValueStore, MemoryStore, StoreError};
pub use store::{EntryStore, GardenState};
pub use timers::{FeedbackTimers, TimerKind};

// Config exports
pub use config::{
    default_config_path, default_data_dir, load_config, load_config_from_path,
    load_config_with_env, ConfigError, ConfigOverrides, ConfigSource, GardenConfig, GardenToml,
};
