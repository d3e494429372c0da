//! Garden Client
//!
//! Thin wrapper around the [`GardenController`] for TUI integration.
//! The controller is embedded directly (no network); this client owns it
//! together with the receiving end of its message channel.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any journaling logic.
//! Its job is:
//! 1. Convert terminal events to `GardenEvent`s
//! 2. Send them to the controller
//! 3. Receive `GardenMessage`s
//! 4. Render display state based on messages

use std::time::Instant;

use tokio::sync::mpsc;

use garden_core::{
    EntryStore, FileStore, GardenConfig, GardenController, GardenEvent, GardenMessage, Screen,
};

/// Client for communicating with the embedded controller
pub struct GardenClient {
    /// The embedded controller
    controller: GardenController,
    /// Receiver for messages from the controller
    rx: mpsc::UnboundedReceiver<GardenMessage>,
}

impl GardenClient {
    /// Open the garden stored under the configured data directory
    pub fn open(config: GardenConfig) -> Self {
        let store = EntryStore::open(FileStore::new(&config.data_dir));
        Self::with_store(config, store)
    }

    /// Create a client over an already opened store
    pub fn with_store(config: GardenConfig, store: EntryStore) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = GardenController::new(config, store, tx);
        Self { controller, rx }
    }

    /// Ask the controller for a full snapshot
    pub fn connect(&mut self) {
        self.controller.connect();
    }

    /// Forward a surface event
    pub fn send(&mut self, event: GardenEvent) {
        self.controller.handle_event(event, Instant::now());
    }

    /// Fire due timers
    pub fn tick(&mut self) {
        self.controller.tick(Instant::now());
    }

    /// Receive all pending messages from the controller (non-blocking)
    pub fn recv_all(&mut self) -> Vec<GardenMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Current screen, as the controller sees it
    pub fn screen(&self) -> Screen {
        self.controller.screen()
    }

    /// Flush pending drafts before the process exits
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }
}
