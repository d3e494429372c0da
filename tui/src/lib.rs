//! Secret Garden TUI - Terminal surface for the Secret Garden journal
//!
//! This crate is a thin display client over `garden-core`. The controller
//! owns every rule of the journal; this crate turns key presses into
//! `GardenEvent`s and `GardenMessage`s into frames.
//!
//! # Architecture
//!
//! ```text
//! crossterm events ──► keymap ──► GardenClient ──► GardenController
//!                                                        │
//!        ratatui frame ◄── App::render ◄── DisplayState ◄┘ (GardenMessage)
//! ```
//!
//! - **App**: event loop, overlays, rendering
//! - **Keymap**: the menu of key bindings per screen
//! - **Overlay**: help, about, and the export/import path chooser
//! - **Widgets**: borderless wrapped writing area
//! - **Cli**: flags and headless subcommands

pub mod app;
pub mod cli;
pub mod display;
pub mod garden_client;
pub mod keymap;
pub mod overlay;
pub mod theme;
pub mod widgets;

pub use app::App;
