//! Terminal output helpers for the one-shot commands
//!
//! # Quiet Mode
//!
//! The loading spinner is suppressed when:
//! - `--quiet` flag is passed
//! - `MOLSEARCH_QUIET=1` environment variable is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use molsearch_core::{DisplayView, PageHandle, ResultSlot};
use once_cell::sync::Lazy;
use regex::Regex;

/// Global quiet mode state
static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Braille spinner frames, shared with the TUI loading indicator
pub const SPINNER_FRAMES: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|</(?:tr|div|p|li|h[1-6])\s*>").unwrap());
static CELL_END_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)</t[dh]\s*>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static BLANK_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").unwrap());

/// Initialize quiet mode from flags and environment
///
/// Call this once at startup with the --quiet flag value.
pub fn init_quiet_mode(quiet_flag: bool) {
    let is_quiet = quiet_flag
        || std::env::var("MOLSEARCH_QUIET").map(|v| v == "1").unwrap_or(false)
        || !std::io::stderr().is_terminal();

    QUIET_MODE.set(is_quiet).ok();
}

/// Check if we're in quiet mode
pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

/// Create a spinner that respects quiet mode
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let style = ProgressStyle::default_spinner()
        .tick_chars(&format!("{} ", SPINNER_FRAMES))
        .template("{spinner:.cyan} {msg}")
        .ok()?;
    let pb = ProgressBar::new_spinner();
    pb.set_style(style);
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

/// Flatten a backend HTML fragment to plain text for the terminal.
///
/// Rows and blocks become lines, table cells are separated by two spaces,
/// other tags are dropped and the common entities decoded.
pub fn fragment_text(html: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(html, "\n");
    let text = CELL_END_RE.replace_all(&text, "  ");
    let text = TAG_RE.replace_all(&text, "");
    let text = decode_entities(&text);
    let text = BLANK_RUN_RE.replace_all(&text, "\n");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Display view whose loading indicator is a terminal spinner.
///
/// Everything else is recorded on the page, which the command prints once
/// the search settles.
pub struct SpinnerDisplay {
    page: PageHandle,
    message: String,
    spinner: Option<ProgressBar>,
}

impl SpinnerDisplay {
    pub fn new(page: PageHandle, message: impl Into<String>) -> Self {
        Self {
            page,
            message: message.into(),
            spinner: None,
        }
    }
}

impl DisplayView for SpinnerDisplay {
    fn loading_visible(&self) -> bool {
        self.page.loading_visible()
    }

    fn set_loading_visible(&mut self, visible: bool) {
        self.page.set_loading_visible(visible);
        if visible {
            self.spinner = spinner(self.message.clone());
        } else if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }

    fn result_visible(&self) -> bool {
        self.page.result_visible()
    }

    fn set_result_visible(&mut self, visible: bool) {
        self.page.set_result_visible(visible);
    }

    fn write_slot(&mut self, slot: ResultSlot, fragment: &str) {
        self.page.write_slot(slot, fragment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molsearch_core::PageEvent;

    #[test]
    fn test_fragment_text_flattens_table() {
        let html = "<table><tr><td>MW</td><td>46.07</td></tr>\n<tr><td>LogP</td><td>-0.31</td></tr></table>";
        assert_eq!(fragment_text(html), "MW  46.07\nLogP  -0.31");
    }

    #[test]
    fn test_fragment_text_decodes_entities_and_breaks() {
        assert_eq!(fragment_text("a&amp;b<br/>c &lt; d"), "a&b\nc < d");
        assert_eq!(fragment_text("<p>one</p><p>two</p>"), "one\ntwo");
    }

    #[test]
    fn test_fragment_text_plain_passthrough() {
        assert_eq!(fragment_text("c1ccccc1"), "c1ccccc1");
        assert_eq!(fragment_text(""), "");
    }

    #[test]
    fn test_spinner_display_records_on_page() {
        let page = PageHandle::new();
        let mut display = SpinnerDisplay::new(page.clone(), "Searching...");
        display.set_loading_visible(true);
        display.set_loading_visible(false);
        display.write_slot(ResultSlot::Smiles, "CCO");

        let page = page.borrow();
        assert_eq!(
            page.events,
            vec![
                PageEvent::LoadingShown,
                PageEvent::LoadingHidden,
                PageEvent::SlotWritten(ResultSlot::Smiles)
            ]
        );
        assert_eq!(page.slot(ResultSlot::Smiles), "CCO");
    }
}
