//! TUI rendering and terminal management (impure shell)

pub mod feed_view;
pub mod styles;
pub mod viewport;

pub use feed_view::FeedView;
pub use styles::{CardStyles, ColorConfig};
pub use viewport::{Viewport, CELL_HEIGHT_PX, CELL_WIDTH_PX};

use crate::config::keybindings::KeyBindings;
use crate::dimensions::ImageProbe;
use crate::feed::FeedController;
use crate::model::{AppError, FeedItemId, KeyAction, PlaceId};
use crate::source::ReviewSource;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Layout},
    text::Line,
    widgets::Paragraph,
    Frame, Terminal,
};
use std::io::{self, Stdout};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// How long the event loop waits for input before polling again.
const TICK: Duration = Duration::from_millis(250);

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),

    /// Application error
    #[error("Application error: {0}")]
    App(#[from] AppError),
}

/// How the feed view ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    /// User quit without choosing a card.
    Quit,
    /// User opened a card attached to this place.
    OpenPlace(PlaceId),
}

/// Main TUI application
///
/// Generic over backend to support testing with TestBackend
pub struct TuiApp<B, S, P>
where
    B: Backend,
{
    terminal: Terminal<B>,
    runtime: tokio::runtime::Runtime,
    controller: FeedController<S, P>,
    viewport: Viewport,
    styles: CardStyles,
    key_bindings: KeyBindings,
    selected: Option<FeedItemId>,
    message: Option<String>,
    loading: bool,
}

impl<S: ReviewSource, P: ImageProbe> TuiApp<CrosstermBackend<Stdout>, S, P> {
    /// Create and initialize a new TUI application
    ///
    /// Sets up terminal in raw mode with alternate screen
    pub fn new(
        runtime: tokio::runtime::Runtime,
        controller: FeedController<S, P>,
        styles: CardStyles,
    ) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self::with_terminal(
            terminal,
            runtime,
            controller,
            styles,
            KeyBindings::default(),
        ))
    }
}

impl<B, S, P> TuiApp<B, S, P>
where
    B: Backend,
    S: ReviewSource,
    P: ImageProbe,
{
    fn with_terminal(
        terminal: Terminal<B>,
        runtime: tokio::runtime::Runtime,
        mut controller: FeedController<S, P>,
        styles: CardStyles,
        key_bindings: KeyBindings,
    ) -> Self {
        let (width, height) = match terminal.size() {
            Ok(size) if size.width > 0 => (size.width, size.height),
            _ => (80, 24),
        };
        let viewport = Viewport::new(width, feed_rows(height));
        runtime.block_on(controller.set_container_width(viewport.container_width_px()));

        Self {
            terminal,
            runtime,
            controller,
            viewport,
            styles,
            key_bindings,
            selected: None,
            message: None,
            loading: false,
        }
    }

    /// Run the main event loop
    ///
    /// Loads the first page, then returns when the user quits or opens a card.
    pub fn run(&mut self) -> Result<FeedAction, TuiError> {
        self.load_first_page()?;

        loop {
            if !event::poll(TICK)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if let Some(action) = self.handle_key(key) {
                        return Ok(action);
                    }
                }
                Event::Resize(width, height) => self.handle_resize(width, height),
                _ => continue,
            }
            self.draw()?;
            self.load_if_near_bottom()?;
        }
    }

    /// Initial batch, first paint, then the rest of the first page.
    fn load_first_page(&mut self) -> Result<(), TuiError> {
        self.loading = true;
        self.draw()?;
        let initial = self.runtime.block_on(self.controller.load_initial());
        self.draw()?;
        let remainder = self
            .runtime
            .block_on(self.controller.load_first_page_remainder());
        self.loading = false;
        info!(initial, remainder, "Loaded first page");

        self.draw()?;
        self.load_if_near_bottom()
    }

    /// Load pages until the viewport is no longer near the bottom.
    fn load_if_near_bottom(&mut self) -> Result<(), TuiError> {
        loop {
            let metrics = self.viewport.metrics(self.controller.content_height());
            if !self.controller.should_load_more(&metrics) {
                return Ok(());
            }

            self.loading = true;
            self.draw()?;
            let added = self.runtime.block_on(self.controller.on_scroll(metrics));
            self.loading = false;
            debug!(added, "Loaded page on scroll");
            self.draw()?;

            if added == 0 {
                return Ok(());
            }
        }
    }

    /// Handle a single keyboard event
    ///
    /// Returns the action ending the view, if any.
    fn handle_key(&mut self, key: KeyEvent) -> Option<FeedAction> {
        // Ctrl+C always quits, even if not in bindings
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(FeedAction::Quit);
        }

        let action = self.key_bindings.get(key)?;
        self.message = None;

        let content_height = self.controller.content_height();
        let row = i64::from(self.viewport.row_px());
        let page = i64::from(self.viewport.height_px());

        match action {
            KeyAction::ScrollDown => self.viewport.scroll_by(row, content_height),
            KeyAction::ScrollUp => self.viewport.scroll_by(-row, content_height),
            KeyAction::PageDown => self.viewport.scroll_by(page, content_height),
            KeyAction::PageUp => self.viewport.scroll_by(-page, content_height),
            KeyAction::ScrollToTop => self.viewport.scroll_to(0, content_height),
            KeyAction::ScrollToBottom => self.viewport.scroll_to(u32::MAX, content_height),
            KeyAction::NextCard => self.cycle_selection(true),
            KeyAction::PrevCard => self.cycle_selection(false),
            KeyAction::OpenCard => return self.open_selected(),
            KeyAction::Quit => return Some(FeedAction::Quit),
        }
        None
    }

    /// Terminal resized: relayout for the new width and keep scroll in range.
    fn handle_resize(&mut self, width: u16, height: u16) {
        self.viewport.resize(width, feed_rows(height));
        self.runtime
            .block_on(self.controller.set_container_width(self.viewport.container_width_px()));

        let content_height = self.controller.content_height();
        self.viewport
            .scroll_to(self.viewport.scroll_top(), content_height);
        if let Some(index) = self.selected_index() {
            let rect = self.controller.items()[index].rect;
            self.viewport.reveal(&rect, content_height);
        }
    }

    /// Card indices in reading order: top to bottom, then left to right.
    fn card_order(&self) -> Vec<usize> {
        let items = self.controller.items();
        let mut order: Vec<usize> = (0..items.len())
            .filter(|&i| !items[i].is_placeholder())
            .collect();
        order.sort_by_key(|&i| (items[i].rect.top, items[i].rect.left));
        order
    }

    fn selected_index(&self) -> Option<usize> {
        let selected = self.selected.as_ref()?;
        self.controller
            .items()
            .iter()
            .position(|item| &item.id == selected)
    }

    /// Move the selection one card forward or back, wrapping at the ends.
    ///
    /// Without a selection, starts from the first (or last) visible card.
    fn cycle_selection(&mut self, forward: bool) {
        let order = self.card_order();
        if order.is_empty() {
            return;
        }
        let items = self.controller.items();

        let current = self
            .selected_index()
            .and_then(|index| order.iter().position(|&i| i == index));
        let next = match current {
            Some(pos) if forward => (pos + 1) % order.len(),
            Some(pos) => (pos + order.len() - 1) % order.len(),
            None => {
                let visible = order
                    .iter()
                    .position(|&i| self.viewport.is_visible(&items[i].rect));
                match (visible, forward) {
                    (Some(pos), true) => pos,
                    (Some(_), false) => order
                        .iter()
                        .rposition(|&i| self.viewport.is_visible(&items[i].rect))
                        .unwrap_or(0),
                    (None, _) => 0,
                }
            }
        };

        let item = &items[order[next]];
        let rect = item.rect;
        self.selected = Some(item.id.clone());
        self.viewport
            .reveal(&rect, self.controller.content_height());
    }

    fn open_selected(&mut self) -> Option<FeedAction> {
        let Some(index) = self.selected_index() else {
            self.message = Some("Select a card with Tab first".to_string());
            return None;
        };
        match &self.controller.items()[index].place_id {
            Some(place) => Some(FeedAction::OpenPlace(place.clone())),
            None => {
                self.message = Some("This review is not attached to a place".to_string());
                None
            }
        }
    }

    fn status_text(&self) -> String {
        if self.loading {
            return "Loading reviews…".to_string();
        }
        if let Some(message) = &self.message {
            return message.clone();
        }
        let cards = self.card_order().len();
        if self.controller.has_more() {
            format!("{cards} cards · j/k scroll · Tab select · Enter open · q quit")
        } else if cards == 0 {
            "No reviews".to_string()
        } else {
            format!("End of feed · {cards} cards")
        }
    }

    fn draw(&mut self) -> Result<(), TuiError> {
        let selected = self.selected_index();
        let status = self.status_text();
        let items = self.controller.items();
        let viewport = &self.viewport;
        let styles = &self.styles;

        self.terminal.draw(|frame: &mut Frame| {
            let [feed_area, status_area] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)])
                    .areas(frame.area());
            frame.render_widget(
                FeedView::new(items, viewport, styles).selected(selected),
                feed_area,
            );
            frame.render_widget(
                Paragraph::new(Line::raw(status)).style(styles.status),
                status_area,
            );
        })?;
        Ok(())
    }
}

/// Rows left for the feed once the status line is drawn.
fn feed_rows(terminal_height: u16) -> u16 {
    terminal_height.saturating_sub(1)
}

// ===== Test Helpers =====
//
// DO NOT use these in production code.

#[cfg(test)]
#[allow(dead_code)]
impl<B, S, P> TuiApp<B, S, P>
where
    B: Backend,
    S: ReviewSource,
    P: ImageProbe,
{
    /// Create TuiApp for testing (test-only constructor)
    pub(crate) fn new_for_test(
        terminal: Terminal<B>,
        runtime: tokio::runtime::Runtime,
        controller: FeedController<S, P>,
    ) -> Self {
        Self::with_terminal(
            terminal,
            runtime,
            controller,
            CardStyles::with_color_config(ColorConfig::from_env_and_args(true)),
            KeyBindings::default(),
        )
    }

    pub(crate) fn load_first_page_test(&mut self) -> Result<(), TuiError> {
        self.load_first_page()
    }

    pub(crate) fn handle_key_test(&mut self, key: KeyEvent) -> Result<Option<FeedAction>, TuiError> {
        let action = self.handle_key(key);
        self.draw()?;
        self.load_if_near_bottom()?;
        Ok(action)
    }

    pub(crate) fn handle_resize_test(&mut self, width: u16, height: u16) {
        self.handle_resize(width, height)
    }

    pub(crate) fn render_test(&mut self) -> Result<(), TuiError> {
        self.draw()
    }

    pub(crate) fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub(crate) fn controller(&self) -> &FeedController<S, P> {
        &self.controller
    }

    pub(crate) fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub(crate) fn selected_id(&self) -> Option<&FeedItemId> {
        self.selected.as_ref()
    }
}

/// Initialize and run the feed view.
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails.
///
/// Note: Logging must be initialized by caller before calling this function.
pub fn run_feed<S: ReviewSource, P: ImageProbe>(
    runtime: tokio::runtime::Runtime,
    controller: FeedController<S, P>,
    styles: CardStyles,
) -> Result<FeedAction, TuiError> {
    let mut app = match TuiApp::new(runtime, controller, styles) {
        Ok(app) => app,
        Err(e) => {
            restore_terminal()?;
            return Err(e);
        }
    };

    // Run the app and ensure cleanup happens even on error
    let result = app.run();

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), TuiError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
