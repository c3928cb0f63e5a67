//! Core application state for the interactive search page

use std::path::PathBuf;

use molsearch_core::{
    Completion, MoleculeResult, PageHandle, PendingSearch, SearchFailure, SearchSession,
    SessionViews, StructureSource, UiState,
};
use tracing::debug;

use crate::ui::SPINNER_FRAMES;

/// Which input currently receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Free-text structure input
    #[default]
    Query,
    /// Options panel (only reachable while it is open)
    Options,
}

/// Network outcomes delivered back to the UI thread
#[derive(Debug)]
pub enum SessionEvent {
    OptionsLoaded(Result<Vec<String>, SearchFailure>),
    SearchFinished {
        seq: u64,
        outcome: Result<MoleculeResult, SearchFailure>,
    },
}

/// Main application state
pub struct App {
    /// Page every session component writes to; the renderer reads it
    pub page: PageHandle,
    pub session: SearchSession,
    pub focus: Focus,
    /// Cursor in the query field, in chars
    pub query_cursor: usize,
    /// Highlighted control in the options panel
    pub option_cursor: usize,
    /// Frame counter driving the loading spinner
    pub tick: usize,
    /// Backend shown in the header
    pub backend: String,
    /// Where Ctrl+S writes the current depiction
    pub svg_path: PathBuf,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message (shown in status bar)
    pub status_message: Option<String>,
}

impl App {
    pub fn new(
        structure: Box<dyn StructureSource>,
        backend: impl Into<String>,
        svg_path: PathBuf,
    ) -> Self {
        let page = PageHandle::new();
        let session = SearchSession::new(SessionViews::from_page(&page, structure));
        Self {
            page,
            session,
            focus: Focus::Query,
            query_cursor: 0,
            option_cursor: 0,
            tick: 0,
            backend: backend.into(),
            svg_path,
            should_quit: false,
            status_message: None,
        }
    }

    /// Set status message
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some(msg.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Apply a network outcome on the UI thread
    pub fn apply(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::OptionsLoaded(outcome) => {
                let loaded = outcome.as_ref().map(Vec::len).ok();
                self.session.apply_options(outcome);
                if let Some(count) = loaded {
                    self.set_status(format!("{} search options", count));
                }
            }
            SessionEvent::SearchFinished { seq, outcome } => {
                if self.session.complete_search(seq, outcome) == Completion::Discarded {
                    debug!(seq, "superseded search finished");
                    return;
                }
                self.clamp_query_cursor();
                self.clear_status();
            }
        }
    }

    /// Start a search; the caller runs the request and reports back
    pub fn begin_search(&mut self) -> PendingSearch {
        self.clear_status();
        let pending = self.session.begin_submit();
        // A drawn structure may have replaced the query text
        self.query_cursor = self.query_len();
        pending
    }

    pub fn state(&self) -> UiState {
        self.session.state()
    }

    /// Tab: move between the query and the options panel, opening it if needed
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Query => {
                if !self.session.options().is_open() {
                    self.session.options_mut().open();
                }
                Focus::Options
            }
            Focus::Options => Focus::Query,
        };
    }

    /// Ctrl+O: show or hide the options panel
    pub fn toggle_options_panel(&mut self) {
        self.session.options_mut().toggle();
        if !self.session.options().is_open() {
            self.focus = Focus::Query;
        }
    }

    fn query_len(&self) -> usize {
        self.page.borrow().query.chars().count()
    }

    fn clamp_query_cursor(&mut self) {
        self.query_cursor = self.query_cursor.min(self.query_len());
    }

    fn query_byte_index(&self) -> usize {
        let page = self.page.borrow();
        page.query
            .char_indices()
            .nth(self.query_cursor)
            .map(|(i, _)| i)
            .unwrap_or(page.query.len())
    }

    /// Add a char to the query field
    pub fn query_insert(&mut self, c: char) {
        self.clamp_query_cursor();
        let at = self.query_byte_index();
        self.page.borrow_mut().query.insert(at, c);
        self.query_cursor += 1;
    }

    /// Delete char before cursor in the query field
    pub fn query_backspace(&mut self) {
        self.clamp_query_cursor();
        if self.query_cursor > 0 {
            self.query_cursor -= 1;
            let at = self.query_byte_index();
            self.page.borrow_mut().query.remove(at);
        }
    }

    pub fn query_left(&mut self) {
        self.query_cursor = self.query_cursor.saturating_sub(1);
    }

    pub fn query_right(&mut self) {
        if self.query_cursor < self.query_len() {
            self.query_cursor += 1;
        }
    }

    /// Query text split at the cursor
    pub fn query_parts(&self) -> (String, String) {
        let at = self.query_byte_index();
        let page = self.page.borrow();
        (page.query[..at].to_string(), page.query[at..].to_string())
    }

    fn option_count(&self) -> usize {
        self.page.borrow().fields.len()
    }

    /// Select next control in the options panel
    pub fn select_next(&mut self) {
        let len = self.option_count();
        if len > 0 {
            self.option_cursor = (self.option_cursor + 1) % len;
        }
    }

    /// Select previous control in the options panel
    pub fn select_prev(&mut self) {
        let len = self.option_count();
        if len > 0 {
            self.option_cursor = self
                .option_cursor
                .checked_sub(1)
                .unwrap_or(len.saturating_sub(1));
        }
    }

    /// Tick or untick the highlighted control
    pub fn toggle_selected_option(&mut self) {
        self.page.borrow_mut().toggle_field(self.option_cursor);
    }

    /// Ctrl+S: write the current depiction to `svg_path`
    pub fn save_svg(&mut self) {
        let svg = match self.session.display().current() {
            Some(result) if self.page.borrow().result => result.svg.clone(),
            _ => {
                self.set_status("No result to save");
                return;
            }
        };
        match std::fs::write(&self.svg_path, svg) {
            Ok(()) => self.set_status(format!("Saved {}", self.svg_path.display())),
            Err(e) => self.set_status(format!(
                "Failed to write {}: {}",
                self.svg_path.display(),
                e
            )),
        }
    }

    /// Current spinner glyph
    pub fn spinner_frame(&self) -> char {
        let frames: Vec<char> = SPINNER_FRAMES.chars().collect();
        frames[self.tick % frames.len()]
    }
}
