//! Error channel: one slot, one message at a time.

use tracing::warn;

use crate::error::SearchFailure;
use crate::view::ErrorView;

/// Longest response body quoted in an error message
const MAX_BODY_BYTES: usize = 500;

pub struct ErrorChannel {
    view: Box<dyn ErrorView>,
    current: Option<String>,
}

impl ErrorChannel {
    pub fn new(view: Box<dyn ErrorView>) -> Self {
        Self {
            view,
            current: None,
        }
    }

    /// Render a failure into the slot, replacing whatever was there
    pub fn display_error(&mut self, failure: &SearchFailure) {
        let message = describe(failure);
        warn!(endpoint = %failure.endpoint(), "{}", message);
        self.view.show_message(&message);
        self.current = Some(message);
    }

    pub fn clear_error_message(&mut self) {
        self.view.clear();
        self.current = None;
    }

    /// Message currently shown, if any
    pub fn message(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

/// Human-readable message for either failure shape
pub fn describe(failure: &SearchFailure) -> String {
    match failure {
        SearchFailure::Http(http) => {
            let mut message = format!("{} failed: {}", http.endpoint, http.status);
            if !http.reason.is_empty() {
                message.push(' ');
                message.push_str(&http.reason);
            }
            let body = http.body.trim();
            if !body.is_empty() {
                message.push_str(": ");
                message.push_str(truncate(body, MAX_BODY_BYTES));
            }
            message
        }
        SearchFailure::Transport(transport) => {
            format!("{} request failed: {}", transport.endpoint, transport.message)
        }
    }
}

fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
