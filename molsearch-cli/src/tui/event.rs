//! Event handling for the TUI

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::app::{App, Focus};

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling a key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// Continue running
    Continue,
    /// Quit the application
    Quit,
    /// Submit a search with the current page contents
    Submit,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }

    // Global shortcuts
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return HandleResult::Quit,
            KeyCode::Char('o') => {
                app.toggle_options_panel();
                return HandleResult::Continue;
            }
            KeyCode::Char('s') => {
                app.save_svg();
                return HandleResult::Continue;
            }
            _ => return HandleResult::Continue,
        }
    }

    match key.code {
        KeyCode::Esc => return HandleResult::Quit,
        KeyCode::Enter => return HandleResult::Submit,
        KeyCode::Tab | KeyCode::BackTab => {
            app.toggle_focus();
            return HandleResult::Continue;
        }
        _ => {}
    }

    match app.focus {
        Focus::Query => handle_query(app, key),
        Focus::Options => handle_options(app, key),
    }
}

/// Keys while the query field is focused
fn handle_query(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char(c) => app.query_insert(c),
        KeyCode::Backspace => app.query_backspace(),
        KeyCode::Left => app.query_left(),
        KeyCode::Right => app.query_right(),
        _ => {}
    }
    HandleResult::Continue
}

/// Keys while the options panel is focused
fn handle_options(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
        KeyCode::Char(' ') | KeyCode::Char('x') => app.toggle_selected_option(),
        _ => {}
    }
    HandleResult::Continue
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use molsearch_core::NothingDrawn;

    fn app() -> App {
        App::new(Box::new(NothingDrawn), "http://test", PathBuf::from("out.svg"))
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_typing_goes_to_query() {
        let mut app = app();
        for c in "CCj".chars() {
            assert_eq!(handle_key(&mut app, press(KeyCode::Char(c))), HandleResult::Continue);
        }
        handle_key(&mut app, press(KeyCode::Backspace));
        assert_eq!(app.page.borrow().query, "CC");
    }

    #[test]
    fn test_enter_submits_and_escape_quits() {
        let mut app = app();
        assert_eq!(handle_key(&mut app, press(KeyCode::Enter)), HandleResult::Submit);
        assert_eq!(handle_key(&mut app, press(KeyCode::Esc)), HandleResult::Quit);
        assert_eq!(handle_key(&mut app, ctrl('c')), HandleResult::Quit);
    }

    #[test]
    fn test_options_navigation_does_not_type() {
        let mut app = app();
        app.session.options_mut().initialize(&["LogP", "TPSA"]);
        handle_key(&mut app, press(KeyCode::Tab));
        handle_key(&mut app, press(KeyCode::Char('j')));
        handle_key(&mut app, press(KeyCode::Char(' ')));

        assert_eq!(app.page.borrow().query, "");
        assert!(app.session.options().collect().contains_key("TPSA"));
    }

    #[test]
    fn test_ctrl_o_toggles_panel() {
        let mut app = app();
        handle_key(&mut app, ctrl('o'));
        assert!(app.session.options().is_open());
        handle_key(&mut app, ctrl('o'));
        assert!(!app.session.options().is_open());
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = app();
        let mut key = press(KeyCode::Enter);
        key.kind = KeyEventKind::Release;
        assert_eq!(handle_key(&mut app, key), HandleResult::Continue);
    }
}
