//! Session Controller
//!
//! The headless heart of the journal. `GardenController` owns the session
//! state (screen, mode, prompt cursor, input buffers, penny) and the entry
//! store, reacts to [`GardenEvent`]s from a surface, and reports every
//! visible change as a [`GardenMessage`].
//!
//! # Screens
//!
//! ```text
//!   vault ──unlock──▶ garden ──select_mode──▶ journal
//!                       ▲                        │
//!                       └────return_to_garden────┘
//! ```
//!
//! The controller is synchronous. Anything time-driven goes through
//! [`FeedbackTimers`] and is resolved when the surface calls [`tick`].
//!
//! [`tick`]: GardenController::tick

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::archive;
use crate::config::GardenConfig;
use crate::entry::{now_ms, EntryId, EntryIdGenerator, JournalEntry, WritingMode};
use crate::error::GardenError;
use crate::events::{BufferEdit, GardenEvent};
use crate::messages::{
    BufferTarget, GardenMessage, NotifyLevel, SaveFeedbackKind, TransferKind, TransferOutcome,
};
use crate::penny::{self, PennyDisplay};
use crate::progress;
use crate::prompts::{self, GUIDED_PROMPTS};
use crate::store::EntryStore;
use crate::timers::{FeedbackTimers, TimerKind};

/// Text shown under the passphrase field after a wrong guess
pub const VAULT_ERROR_TEXT: &str = "Hmm, that doesn't seem to be the right key to the garden...";

// ============================================================================
// Session state
// ============================================================================

/// Top-level screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// Passphrase gate
    #[default]
    Vault,
    /// Hub with the progress line and mode choices
    Garden,
    /// Writing area of one mode
    Journal,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Vault => "vault",
            Self::Garden => "garden",
            Self::Journal => "journal",
        })
    }
}

/// Ephemeral per-process session; never persisted
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Screen being shown
    pub screen: Screen,
    /// Active writing mode; only set on the journal screen
    pub mode: Option<WritingMode>,
    /// Guided catalog cursor; wraps and is never reset
    pub prompt_index: usize,
    /// Candidate passphrase typed on the vault screen
    pub passphrase: String,
    /// Penny panel state
    pub penny: PennyDisplay,
    buffers: [String; 3],
}

impl SessionState {
    /// Text in a mode's writing area
    #[must_use]
    pub fn buffer(&self, mode: WritingMode) -> &str {
        &self.buffers[slot(mode)]
    }

    fn buffer_mut(&mut self, mode: WritingMode) -> &mut String {
        &mut self.buffers[slot(mode)]
    }

    /// Modes whose writing area holds more than whitespace
    #[must_use]
    pub fn unsaved_modes(&self) -> Vec<WritingMode> {
        WritingMode::ALL
            .into_iter()
            .filter(|m| !self.buffer(*m).trim().is_empty())
            .collect()
    }
}

fn slot(mode: WritingMode) -> usize {
    match mode {
        WritingMode::Guided => 0,
        WritingMode::Free => 1,
        WritingMode::Penny => 2,
    }
}

// ============================================================================
// Controller
// ============================================================================

/// Owns the session and the store; turns events into messages
pub struct GardenController {
    config: GardenConfig,
    store: EntryStore,
    session: SessionState,
    timers: FeedbackTimers,
    ids: EntryIdGenerator,
    rng: Box<dyn RngCore + Send>,
    tx: mpsc::UnboundedSender<GardenMessage>,
    vault_error_gen: u64,
    save_feedback_gen: u64,
    flip_gen: u64,
    quit_armed: bool,
}

impl GardenController {
    /// Create a controller over `store`, restoring autosaved drafts
    pub fn new(
        config: GardenConfig,
        store: EntryStore,
        tx: mpsc::UnboundedSender<GardenMessage>,
    ) -> Self {
        let last_id = store.entries().iter().map(|e| e.id.0).max().unwrap_or(0);
        let mut session = SessionState::default();

        if config.autosave_drafts {
            for mode in WritingMode::ALL {
                if let Some(draft) = store.load_draft(mode) {
                    tracing::debug!(mode = %mode, chars = draft.chars().count(), "Restored draft");
                    *session.buffer_mut(mode) = draft;
                }
            }
        }

        Self {
            config,
            store,
            session,
            timers: FeedbackTimers::new(),
            ids: EntryIdGenerator::after(last_id),
            rng: Box::new(StdRng::from_entropy()),
            tx,
            vault_error_gen: 0,
            save_feedback_gen: 0,
            flip_gen: 0,
            quit_armed: false,
        }
    }

    /// Replace the random source used for penny flips
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Session state
    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Entry store
    #[must_use]
    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    /// Resolved configuration
    #[must_use]
    pub fn config(&self) -> &GardenConfig {
        &self.config
    }

    /// Current screen
    #[must_use]
    pub fn screen(&self) -> Screen {
        self.session.screen
    }

    /// Whether any writing area holds unsaved text
    #[must_use]
    pub fn has_unsaved_input(&self) -> bool {
        !self.session.unsaved_modes().is_empty()
    }

    /// Earliest pending timer, so a surface can sleep until then
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Send a full snapshot to a newly attached surface
    pub fn connect(&mut self) {
        self.emit_screen();
        self.emit_progress();
        self.send(GardenMessage::GuidedPrompt {
            index: self.session.prompt_index,
            prompt: prompts::guided(self.session.prompt_index).to_string(),
        });
        self.send(GardenMessage::Penny {
            display: self.session.penny.clone(),
        });
        for mode in WritingMode::ALL {
            let text = self.session.buffer(mode).to_string();
            if !text.is_empty() {
                self.send(GardenMessage::Buffer {
                    target: BufferTarget::Mode(mode),
                    text,
                });
            }
        }
    }

    // ========================================================================
    // Event dispatch
    // ========================================================================

    /// Handle an event from the surface
    ///
    /// Refused actions are logged and otherwise ignored; failures have
    /// already been reported to the surface as messages.
    pub fn handle_event(&mut self, event: GardenEvent, now: Instant) {
        if !matches!(event, GardenEvent::QuitRequested { .. }) {
            self.quit_armed = false;
        }

        let result = match event {
            GardenEvent::Edit(edit) => self.edit(&edit, now),
            GardenEvent::Unlock => self.unlock(now),
            GardenEvent::SelectMode(mode) => self.select_mode(mode),
            GardenEvent::NewEntry => self.new_entry(),
            GardenEvent::ReturnToGarden => self.return_to_garden(),
            GardenEvent::AdvancePrompt => self.advance_prompt(),
            GardenEvent::Flip => self.flip(now),
            GardenEvent::SaveEntry => self.save_entry(now).map(|_| ()),
            GardenEvent::Export { path } => self.export(path.as_deref()).map(|_| ()),
            GardenEvent::Import { path } => self.import(path.as_deref()).map(|_| ()),
            GardenEvent::QuitRequested { force } => {
                self.request_quit(force);
                Ok(())
            }
        };

        if let Err(e) = result {
            if e.is_refusal() {
                tracing::debug!(screen = %self.session.screen, reason = %e, "Action ignored");
            } else {
                tracing::warn!(screen = %self.session.screen, error = %e, "Action failed");
            }
        }
    }

    /// Fire every timer that has come due
    pub fn tick(&mut self, now: Instant) {
        for kind in self.timers.due(now) {
            match kind {
                TimerKind::ClearVaultError(id) => {
                    self.send(GardenMessage::VaultErrorCleared { id });
                }
                TimerKind::ClearSaveFeedback(id) => {
                    self.send(GardenMessage::SaveFeedbackCleared { id });
                }
                TimerKind::RevealPenny(generation) => self.reveal_penny(generation),
                TimerKind::FlushDraft(mode) => self.flush_draft(mode),
            }
        }
    }

    /// Write any pending drafts immediately; call before exiting
    pub fn shutdown(&mut self) {
        for mode in WritingMode::ALL {
            if self.timers.is_pending(TimerKind::FlushDraft(mode)) {
                self.flush_draft(mode);
            }
        }
        tracing::debug!("Controller shut down");
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Apply an edit to the buffer the current screen writes to
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::NotAvailable`] on the garden screen.
    pub fn edit(&mut self, edit: &BufferEdit, now: Instant) -> Result<(), GardenError> {
        match (self.session.screen, self.session.mode) {
            (Screen::Vault, _) => {
                edit.apply(&mut self.session.passphrase);
                self.send(GardenMessage::Buffer {
                    target: BufferTarget::Passphrase,
                    text: self.session.passphrase.clone(),
                });
                Ok(())
            }
            (Screen::Journal, Some(mode)) => {
                let buffer = self.session.buffer_mut(mode);
                edit.apply(buffer);
                let text = buffer.clone();
                self.send(GardenMessage::Buffer {
                    target: BufferTarget::Mode(mode),
                    text,
                });
                if self.config.autosave_drafts {
                    self.timers
                        .debounce(TimerKind::FlushDraft(mode), now, self.config.draft_debounce);
                }
                Ok(())
            }
            _ => Err(self.not_available("typing")),
        }
    }

    /// Try the passphrase buffer against the accepted keys
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::InvalidPassphrase`] on a wrong key (the error is
    /// shown and cleared after a while), or [`GardenError::NotAvailable`] once
    /// the vault is already open.
    pub fn unlock(&mut self, now: Instant) -> Result<(), GardenError> {
        if self.session.screen != Screen::Vault {
            return Err(self.not_available("unlock"));
        }

        let accepted = self.config.accepts(&self.session.passphrase);
        self.session.passphrase.clear();
        self.send(GardenMessage::Buffer {
            target: BufferTarget::Passphrase,
            text: String::new(),
        });

        if !accepted {
            self.vault_error_gen += 1;
            let id = self.vault_error_gen;
            self.send(GardenMessage::VaultError {
                id,
                message: VAULT_ERROR_TEXT.to_string(),
            });
            self.timers
                .schedule(TimerKind::ClearVaultError(id), now, self.config.error_flash);
            tracing::debug!("Wrong passphrase");
            return Err(GardenError::InvalidPassphrase);
        }

        tracing::info!("Vault unlocked");
        self.enter_garden();
        Ok(())
    }

    /// Open the journal in `mode`
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::NotAvailable`] while the vault is locked.
    pub fn select_mode(&mut self, mode: WritingMode) -> Result<(), GardenError> {
        if self.session.screen == Screen::Vault {
            return Err(self.not_available("select mode"));
        }

        self.session.screen = Screen::Journal;
        self.session.mode = Some(mode);
        tracing::debug!(mode = %mode, "Entered journal");
        self.emit_screen();

        match mode {
            WritingMode::Guided => self.emit_guided_prompt(),
            WritingMode::Penny => {
                self.session.penny = PennyDisplay::Unrevealed;
                self.send(GardenMessage::Penny {
                    display: PennyDisplay::Unrevealed,
                });
            }
            WritingMode::Free => {}
        }
        Ok(())
    }

    /// Start a new entry: open the journal in free mode
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::NotAvailable`] while the vault is locked.
    pub fn new_entry(&mut self) -> Result<(), GardenError> {
        if self.session.screen == Screen::Vault {
            return Err(self.not_available("new entry"));
        }
        self.select_mode(WritingMode::Free)
    }

    /// Go back to the hub; writing areas keep their text
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::NotAvailable`] while the vault is locked.
    pub fn return_to_garden(&mut self) -> Result<(), GardenError> {
        if self.session.screen == Screen::Vault {
            return Err(self.not_available("return to garden"));
        }
        self.enter_garden();
        Ok(())
    }

    /// Move the guided cursor to the next prompt, wrapping at the end
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::NotAvailable`] outside guided mode.
    pub fn advance_prompt(&mut self) -> Result<(), GardenError> {
        if self.active_mode() != Some(WritingMode::Guided) {
            return Err(self.not_available("next prompt"));
        }
        self.session.prompt_index = (self.session.prompt_index + 1) % GUIDED_PROMPTS.len();
        self.emit_guided_prompt();
        Ok(())
    }

    /// Toss the penny; the result lands when the settle timer fires
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::FlipInProgress`] while a flip is settling, or
    /// [`GardenError::NotAvailable`] outside penny mode.
    pub fn flip(&mut self, now: Instant) -> Result<(), GardenError> {
        if self.active_mode() != Some(WritingMode::Penny) {
            return Err(self.not_available("flip"));
        }
        if self.session.penny == PennyDisplay::Flipping {
            return Err(GardenError::FlipInProgress);
        }

        self.flip_gen += 1;
        self.session.penny = PennyDisplay::Flipping;
        self.send(GardenMessage::Penny {
            display: PennyDisplay::Flipping,
        });
        self.timers
            .schedule(TimerKind::RevealPenny(self.flip_gen), now, self.config.flip_settle);
        Ok(())
    }

    /// Save the active writing area as a new entry
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::NothingToSave`] for an empty area,
    /// [`GardenError::StorageUnavailable`] if the entry or counter could not
    /// be written, or [`GardenError::NotAvailable`] outside the journal.
    pub fn save_entry(&mut self, now: Instant) -> Result<EntryId, GardenError> {
        let Some(mode) = self.active_mode() else {
            return Err(self.not_available("save"));
        };

        let content = self.session.buffer(mode).trim().to_string();
        if content.is_empty() {
            self.flash_save(SaveFeedbackKind::NothingToSave, now);
            return Err(GardenError::NothingToSave);
        }

        let prompt = (mode == WritingMode::Guided)
            .then(|| prompts::guided(self.session.prompt_index).to_string());
        let entry = JournalEntry {
            id: self.ids.next_at(now_ms()),
            created_at: Utc::now(),
            mode,
            content,
            prompt,
        };
        let id = entry.id;

        if let Err(e) = self.store.record_save(entry) {
            self.flash_save(SaveFeedbackKind::Failed, now);
            self.send(GardenMessage::Notify {
                level: NotifyLevel::Error,
                message: format!("Your entry could not be saved: {e}"),
            });
            return Err(e);
        }

        tracing::info!(
            mode = %mode,
            id = id.0,
            flower_count = self.store.flower_count(),
            "Entry saved"
        );

        self.flash_save(SaveFeedbackKind::Saved, now);
        self.session.buffer_mut(mode).clear();
        self.send(GardenMessage::Buffer {
            target: BufferTarget::Mode(mode),
            text: String::new(),
        });
        if let Err(e) = self.store.clear_draft(mode) {
            tracing::warn!(mode = %mode, error = %e, "Could not remove draft after save");
        }
        self.emit_progress();
        Ok(id)
    }

    /// Export the garden to `path`; `None` means the chooser was dismissed
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::NotAvailable`] while the vault is locked. Export
    /// failures are reported in the returned outcome, not as errors.
    pub fn export(&mut self, path: Option<&Path>) -> Result<TransferOutcome, GardenError> {
        if self.session.screen == Screen::Vault {
            return Err(self.not_available("export"));
        }

        let outcome = match path {
            None => TransferOutcome::Cancelled,
            Some(path) => archive::outcome(path, archive::export_to_path(&self.store, path)),
        };
        self.report_transfer(TransferKind::Export, &outcome);
        Ok(outcome)
    }

    /// Replace the garden from `path`; `None` means the chooser was dismissed
    ///
    /// # Errors
    ///
    /// Returns [`GardenError::NotAvailable`] while the vault is locked. Import
    /// failures are reported in the returned outcome, not as errors.
    pub fn import(&mut self, path: Option<&Path>) -> Result<TransferOutcome, GardenError> {
        if self.session.screen == Screen::Vault {
            return Err(self.not_available("import"));
        }

        let outcome = match path {
            None => TransferOutcome::Cancelled,
            Some(path) => archive::outcome(path, archive::import_from_path(&mut self.store, path)),
        };
        self.report_transfer(TransferKind::Import, &outcome);
        if outcome.is_completed() {
            if let Some(max_id) = self.store.entries().iter().map(|e| e.id.0).max() {
                self.ids.advance_past(max_id);
            }
            self.emit_progress();
        }
        Ok(outcome)
    }

    /// Ask to leave; returns whether the surface should exit now
    ///
    /// With unsaved text the first request is held back and a warning sent;
    /// a second request in a row goes through.
    pub fn request_quit(&mut self, force: bool) -> bool {
        let unsaved = self.session.unsaved_modes();
        if force || unsaved.is_empty() || self.quit_armed {
            tracing::info!(unsaved = unsaved.len(), "Quitting");
            self.send(GardenMessage::Quit);
            return true;
        }

        self.quit_armed = true;
        tracing::debug!(?unsaved, "Quit held back for unsaved input");
        self.send(GardenMessage::UnsavedInput { modes: unsaved });
        false
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn active_mode(&self) -> Option<WritingMode> {
        match self.session.screen {
            Screen::Journal => self.session.mode,
            Screen::Vault | Screen::Garden => None,
        }
    }

    fn not_available(&self, action: &'static str) -> GardenError {
        GardenError::NotAvailable {
            action,
            screen: self.session.screen,
        }
    }

    fn enter_garden(&mut self) {
        self.session.screen = Screen::Garden;
        self.session.mode = None;
        self.emit_screen();
        self.emit_progress();
    }

    fn reveal_penny(&mut self, generation: u64) {
        if generation != self.flip_gen || self.session.penny != PennyDisplay::Flipping {
            tracing::trace!(generation, "Stale penny timer");
            return;
        }

        let result = penny::flip(self.rng.as_mut());
        tracing::debug!(outcome = ?result.outcome, "Penny landed");
        self.session.penny = PennyDisplay::Revealed(result);
        self.send(GardenMessage::Penny {
            display: self.session.penny.clone(),
        });
    }

    fn flush_draft(&mut self, mode: WritingMode) {
        let text = self.session.buffer(mode).to_string();
        let result = if text.is_empty() {
            self.store.clear_draft(mode)
        } else {
            self.store.save_draft(mode, &text)
        };
        match result {
            Ok(()) => tracing::trace!(mode = %mode, chars = text.chars().count(), "Draft flushed"),
            Err(e) => tracing::warn!(mode = %mode, error = %e, "Could not write draft"),
        }
    }

    fn flash_save(&mut self, kind: SaveFeedbackKind, now: Instant) {
        self.save_feedback_gen += 1;
        let id = self.save_feedback_gen;
        self.send(GardenMessage::SaveFeedback { id, kind });
        self.timers
            .schedule(TimerKind::ClearSaveFeedback(id), now, self.config.save_flash);
    }

    fn report_transfer(&mut self, kind: TransferKind, outcome: &TransferOutcome) {
        match outcome {
            TransferOutcome::Completed { path } => {
                tracing::info!(?kind, path = %path.display(), "Transfer completed");
            }
            TransferOutcome::Cancelled => tracing::debug!(?kind, "Transfer cancelled"),
            TransferOutcome::Failed { error } => {
                tracing::warn!(?kind, %error, "Transfer failed");
            }
        }
        self.send(GardenMessage::Transfer {
            kind,
            outcome: outcome.clone(),
        });
    }

    fn emit_screen(&self) {
        self.send(GardenMessage::Screen {
            screen: self.session.screen,
            mode: self.active_mode(),
        });
    }

    fn emit_progress(&self) {
        let count = self.store.flower_count();
        self.send(GardenMessage::Progress {
            flowers: progress::render(count),
            count,
        });
    }

    fn emit_guided_prompt(&self) {
        let index = self.session.prompt_index;
        self.send(GardenMessage::GuidedPrompt {
            index,
            prompt: prompts::guided(index).to_string(),
        });
    }

    fn send(&self, msg: GardenMessage) {
        if let Err(e) = self.tx.send(msg) {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

impl std::fmt::Debug for GardenController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GardenController")
            .field("session", &self.session)
            .field("store", &self.store)
            .field("timers", &self.timers.len())
            .finish_non_exhaustive()
    }
}

/// Export destination suggested to the user for today
#[must_use]
pub fn suggested_export_path() -> PathBuf {
    PathBuf::from(archive::default_export_file_name(
        chrono::Local::now().date_naive(),
    ))
}
