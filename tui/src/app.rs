//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, paste, resize)
//! - GardenClient for the journaling logic
//! - DisplayState for rendering
//!
//! The App:
//! 1. Converts terminal events to `GardenEvent`s (see [`crate::keymap`])
//! 2. Sends them to the embedded controller via `GardenClient`
//! 3. Receives `GardenMessage`s and updates `DisplayState`
//! 4. Renders based on `DisplayState`

use std::time::{Duration, Instant};

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Flex, Layout, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use unicode_width::UnicodeWidthStr;

use garden_core::{
    BufferEdit, BufferTarget, GardenConfig, GardenEvent, GardenMessage, PennyDisplay, Screen,
    TransferKind, WritingMode,
};

use crate::display::DisplayState;
use crate::garden_client::GardenClient;
use crate::keymap::{map_key, Action};
use crate::overlay::{about_text, ChooserOutcome, Overlay, PathChooser, HELP_TEXT};
use crate::theme;
use crate::widgets::{TextBlock, TextBlockState};

/// Frame interval when idle
const FRAME_DURATION: Duration = Duration::from_millis(50);

/// Lines moved per PageUp/PageDown in the writing area
const PAGE_LINES: isize = 5;

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Garden Integration ===
    /// Client for communicating with the embedded controller
    client: GardenClient,
    /// Display state derived from `GardenMessage`s
    display: DisplayState,

    // === UI State ===
    /// Modal panel, if any
    overlay: Overlay,
    /// Writing area scroll and cursor
    writing: TextBlockState,
    /// Last frame time (for notification expiry)
    last_frame: Instant,
}

impl App {
    /// Create an App over the garden in the configured data directory
    pub fn new(config: GardenConfig) -> Self {
        Self::with_client(GardenClient::open(config))
    }

    /// Create an App around an existing client
    pub fn with_client(client: GardenClient) -> Self {
        let mut app = Self {
            running: true,
            client,
            display: DisplayState::new(),
            overlay: Overlay::None,
            writing: TextBlockState::default(),
            last_frame: Instant::now(),
        };
        app.client.connect();
        app.process_garden_messages();
        app
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        // Render initial frame immediately so user sees UI
        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                biased;

                // Terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_terminal_event(event),
                        Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                        None => {
                            tracing::info!("Terminal event stream closed");
                            self.running = false;
                        }
                    }
                }

                // Frame tick - timers and redraw
                () = tokio::time::sleep(FRAME_DURATION) => {}
            }

            self.step();
            terminal.draw(|frame| self.render(frame))?;
        }

        self.client.shutdown();
        Ok(())
    }

    /// Fire timers, apply messages, and age notifications
    pub fn step(&mut self) {
        self.client.tick();
        self.process_garden_messages();

        let now = Instant::now();
        self.display.update(now - self.last_frame);
        self.last_frame = now;
    }

    /// Whether the loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Display state (for inspection)
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Open overlay (for inspection)
    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    /// Message printed after the terminal is restored
    pub fn goodbye(&self) -> String {
        match self.display.flower_count {
            0 => "Your garden is waiting for its first flower. See you soon! 🌱".to_string(),
            1 => "1 flower is growing in your garden. See you soon! 🌸".to_string(),
            n => format!("{n} flowers are growing in your garden. See you soon! 🌸"),
        }
    }

    /// Process all pending messages from the controller
    fn process_garden_messages(&mut self) {
        for msg in self.client.recv_all() {
            if let GardenMessage::Buffer {
                target: BufferTarget::Mode(_),
                ..
            } = &msg
            {
                self.writing.scroll_to_end();
            }
            if matches!(msg, GardenMessage::Screen { .. }) {
                self.writing = TextBlockState::default();
            }

            self.display.apply_message(msg);
        }

        if self.display.quit {
            self.running = false;
        }
    }

    // ========================================================================
    // Input
    // ========================================================================

    /// Handle one terminal event
    pub fn handle_terminal_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Paste(text) => self.handle_paste(&text),
            _ => {}
        }
        self.process_garden_messages();
    }

    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Overlay::PathChooser(chooser) = &mut self.overlay {
            if let Some(outcome) = chooser.handle_key(key) {
                let kind = chooser.kind;
                self.overlay = Overlay::None;
                self.finish_transfer(kind, outcome);
            }
            return;
        }

        let screen = self.client.screen();
        let action = map_key(key, screen);

        if self.overlay.is_open() && action != Some(Action::Quit) {
            self.overlay = Overlay::None;
            return;
        }

        match key.code {
            KeyCode::PageUp if screen == Screen::Journal => {
                self.writing.scroll(-PAGE_LINES);
                return;
            }
            KeyCode::PageDown if screen == Screen::Journal => {
                self.writing.scroll(PAGE_LINES);
                return;
            }
            _ => {}
        }

        match action {
            Some(Action::Garden(event)) => self.client.send(event),
            Some(Action::ChoosePath(kind)) => self.open_chooser(kind),
            Some(Action::Help) => self.overlay = Overlay::Help,
            Some(Action::About) => self.overlay = Overlay::About,
            Some(Action::Quit) => {
                self.overlay = Overlay::None;
                self.client.send(GardenEvent::QuitRequested { force: false });
            }
            None => {}
        }
    }

    /// Handle bracketed paste
    pub fn handle_paste(&mut self, text: &str) {
        match &mut self.overlay {
            Overlay::PathChooser(chooser) => chooser.paste(text),
            Overlay::Help | Overlay::About => {}
            Overlay::None => {
                if self.client.screen() != Screen::Garden {
                    let text = text.replace("\r\n", "\n").replace('\r', "\n");
                    self.client
                        .send(GardenEvent::Edit(BufferEdit::InsertStr(text)));
                }
            }
        }
    }

    fn open_chooser(&mut self, kind: TransferKind) {
        let suggestion = match kind {
            TransferKind::Export => garden_core::suggested_export_path().display().to_string(),
            TransferKind::Import => String::new(),
        };
        self.overlay = Overlay::PathChooser(PathChooser::new(kind, suggestion));
    }

    fn finish_transfer(&mut self, kind: TransferKind, outcome: ChooserOutcome) {
        let path = match outcome {
            ChooserOutcome::Chosen(path) => Some(path),
            ChooserOutcome::Cancelled => None,
        };
        let event = match kind {
            TransferKind::Export => GardenEvent::Export { path },
            TransferKind::Import => GardenEvent::Import { path },
        };
        self.client.send(event);
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let [header, body, status] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.render_header(frame, header);
        match self.display.screen {
            Screen::Vault => self.render_vault(frame, body),
            Screen::Garden => self.render_garden(frame, body),
            Screen::Journal => self.render_journal(frame, body),
        }
        self.render_status(frame, status);
        self.render_overlay(frame);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let flowers = match self.display.screen {
            Screen::Vault => String::new(),
            Screen::Garden | Screen::Journal => self.display.flowers.clone(),
        };
        let header = Paragraph::new(Line::from(Span::styled(
            flowers,
            Style::default().fg(theme::PETAL),
        )))
        .block(
            Block::bordered()
                .border_style(Style::default().fg(theme::MOSS))
                .title(Span::styled(" 🌿 Secret Garden ", theme::title())),
        );
        frame.render_widget(header, area);
    }

    fn render_vault(&self, frame: &mut Frame, area: Rect) {
        let [door] = Layout::vertical([Constraint::Length(9)])
            .flex(Flex::Center)
            .areas(area);
        let [door] = Layout::horizontal([Constraint::Length(54)])
            .flex(Flex::Center)
            .areas(door);

        let masked = "•".repeat(self.display.passphrase.chars().count());
        let error = self
            .display
            .vault_error
            .as_ref()
            .map_or(String::new(), |f| f.value.clone());

        let lines = vec![
            Line::from(Span::styled(
                "Whisper the key to enter your garden",
                Style::default().fg(theme::PAPER),
            )),
            Line::default(),
            Line::from(vec![
                Span::styled("🔑 ", Style::default().fg(theme::SUNFLOWER)),
                Span::raw(masked.clone()),
            ]),
            Line::default(),
            Line::from(Span::styled(error, Style::default().fg(theme::ERROR_RED))),
        ];

        let block = Block::bordered()
            .border_style(Style::default().fg(theme::LEAF))
            .title(Span::styled(" The Vault ", theme::title()));
        let inner = block.inner(door);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), door);

        if !self.overlay.is_open() {
            let col = inner.x + 3 + masked.width() as u16;
            frame.set_cursor_position(Position::new(
                col.min(inner.right().saturating_sub(1)),
                inner.y + 2,
            ));
        }
    }

    fn render_garden(&self, frame: &mut Frame, area: Rect) {
        let count = self.display.flower_count;
        let plural = if count == 1 { "flower" } else { "flowers" };
        let choice = |key: &'static str, mode: WritingMode, blurb: &'static str| {
            Line::from(vec![
                Span::styled(format!("  {key}  "), Style::default().fg(theme::SUNFLOWER)),
                Span::styled(format!("{:<20}", mode.title()), theme::title()),
                Span::styled(blurb, Style::default().fg(theme::DIM_GRAY)),
            ])
        };

        let lines = vec![
            Line::from(Span::styled(
                self.display.flowers.clone(),
                Style::default().fg(theme::PETAL),
            )),
            Line::from(Span::styled(
                format!("{count} {plural} in your garden"),
                Style::default().fg(theme::DIM_GRAY),
            )),
            Line::default(),
            Line::from(Span::styled("Choose your path:", theme::title())),
            Line::default(),
            choice("1", WritingMode::Guided, "Answer thoughtful prompts"),
            choice("2", WritingMode::Free, "Express yourself without limits"),
            choice("3", WritingMode::Penny, "Flip a coin for creative inspiration"),
        ];

        let block = Block::bordered()
            .border_style(Style::default().fg(theme::MOSS))
            .title(Span::styled(" Your Garden ", theme::title()));
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }).block(block), area);
    }

    fn render_journal(&mut self, frame: &mut Frame, area: Rect) {
        let Some(mode) = self.display.mode else {
            return;
        };

        let prompt_height = match mode {
            WritingMode::Free => 0,
            WritingMode::Guided | WritingMode::Penny => 4,
        };
        let [prompt_area, writing_area] =
            Layout::vertical([Constraint::Length(prompt_height), Constraint::Min(3)]).areas(area);

        match mode {
            WritingMode::Guided => {
                let title = format!(
                    " Prompt {} of {} ",
                    self.display.prompt_index + 1,
                    garden_core::prompts::GUIDED_PROMPTS.len()
                );
                let prompt = Paragraph::new(self.display.guided_prompt.as_str())
                    .style(Style::default().fg(theme::PAPER).add_modifier(Modifier::ITALIC))
                    .wrap(Wrap { trim: true })
                    .block(
                        Block::bordered()
                            .border_style(Style::default().fg(theme::MOSS))
                            .title(Span::styled(title, theme::title())),
                    );
                frame.render_widget(prompt, prompt_area);
            }
            WritingMode::Penny => {
                let penny = &self.display.penny;
                let text_style = match penny {
                    PennyDisplay::Revealed(_) => {
                        Style::default().fg(theme::PAPER).add_modifier(Modifier::ITALIC)
                    }
                    PennyDisplay::Unrevealed | PennyDisplay::Flipping => {
                        Style::default().fg(theme::DIM_GRAY)
                    }
                };
                let line = Line::from(vec![
                    Span::styled(format!("{}  ", penny.face()), Style::default().fg(theme::SUNFLOWER)),
                    Span::styled(penny.text().to_string(), text_style),
                ]);
                let panel = Paragraph::new(line).wrap(Wrap { trim: true }).block(
                    Block::bordered()
                        .border_style(Style::default().fg(theme::SUNFLOWER))
                        .title(Span::styled(" Penny ", theme::title())),
                );
                frame.render_widget(panel, prompt_area);
            }
            WritingMode::Free => {}
        }

        let mut block = Block::bordered()
            .border_style(Style::default().fg(theme::MOSS))
            .title(Span::styled(format!(" {} ", mode.title()), theme::title()));
        if let Some(flash) = &self.display.save_feedback {
            block = block.title_bottom(
                Line::from(Span::styled(
                    format!(" {} ", flash.value.label()),
                    theme::save_feedback(flash.value),
                ))
                .right_aligned(),
            );
        }
        let inner = block.inner(writing_area);
        frame.render_widget(block, writing_area);

        let text = self.display.buffer(mode);
        frame.render_stateful_widget(
            TextBlock::new(text)
                .style(Style::default().fg(theme::PAPER))
                .placeholder("Let your thoughts bloom here...", Style::default().fg(theme::DIM_GRAY)),
            inner,
            &mut self.writing,
        );

        if !self.overlay.is_open() {
            if let Some((x, y)) = self.writing.cursor {
                frame.set_cursor_position(Position::new(x, y));
            }
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(notification) = &self.display.notification {
            Line::from(Span::styled(
                format!(" {}", notification.message),
                theme::notify(notification.level),
            ))
        } else {
            let hints = match (self.display.screen, self.display.mode) {
                (Screen::Vault, _) => "Enter unlock | F1 help | Ctrl+Q quit",
                (Screen::Garden, _) => {
                    "1/2/3 choose a path | Ctrl+E export | Ctrl+O import | F1 help | Ctrl+Q quit"
                }
                (Screen::Journal, Some(WritingMode::Guided)) => {
                    "Ctrl+S save | Ctrl+P next prompt | Esc garden | F1 help | Ctrl+Q quit"
                }
                (Screen::Journal, Some(WritingMode::Penny)) => {
                    "Ctrl+S save | Ctrl+F flip | Esc garden | F1 help | Ctrl+Q quit"
                }
                (Screen::Journal, _) => "Ctrl+S save | Esc garden | F1 help | Ctrl+Q quit",
            };
            Line::from(Span::styled(
                format!(" {hints}"),
                Style::default().fg(theme::DIM_GRAY),
            ))
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_overlay(&self, frame: &mut Frame) {
        let (title, body, height) = match &self.overlay {
            Overlay::None => return,
            Overlay::Help => (
                " Welcome to Your Secret Garden! 🌿 ".to_string(),
                HELP_TEXT.to_string(),
                22_u16,
            ),
            Overlay::About => (" Secret Garden Journal ".to_string(), about_text(), 10),
            Overlay::PathChooser(chooser) => (
                format!(" {} ", chooser.title()),
                format!("{}\n\nEnter to confirm | Esc to cancel", chooser.input),
                6,
            ),
        };

        let area = frame.area();
        let [popup] = Layout::vertical([Constraint::Length(height.min(area.height))])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::horizontal([Constraint::Length(72_u16.min(area.width))])
            .flex(Flex::Center)
            .areas(popup);

        let block = Block::bordered()
            .border_style(Style::default().fg(theme::PETAL))
            .title(Span::styled(title, theme::title()));
        let inner = block.inner(popup);

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(body)
                .style(Style::default().fg(theme::PAPER))
                .wrap(Wrap { trim: false })
                .block(block),
            popup,
        );

        if let Overlay::PathChooser(chooser) = &self.overlay {
            let col = inner.x + chooser.input.width() as u16;
            frame.set_cursor_position(Position::new(
                col.min(inner.right().saturating_sub(1)),
                inner.y,
            ));
        }
    }
}
