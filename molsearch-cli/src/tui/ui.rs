//! UI rendering using ratatui
//!
//! Everything drawn here is read back from the page; the render never
//! decides visibility on its own.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use molsearch_core::{Page, ResultSlot, UiState, TOGGLE_ON};

use super::app::{App, Focus};
use crate::ui::fragment_text;

/// Primary accent color
const ACCENT: Color = Color::Cyan;
/// Secondary color for less important elements
const SECONDARY: Color = Color::DarkGray;
/// Highlight color for selected items
const HIGHLIGHT: Color = Color::Yellow;
/// Success color
const SUCCESS: Color = Color::Green;
/// Error color
const FAILURE: Color = Color::Red;
/// Dim text color
const DIM: Color = Color::Rgb(100, 100, 100);

/// Render the entire UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Query input
            Constraint::Min(8),    // Options + result
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_query(frame, app, chunks[0]);

    if app.session.options().is_open() {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(chunks[1]);
        render_options(frame, app, body[0]);
        render_result_area(frame, app, body[1]);
    } else {
        render_result_area(frame, app, chunks[1]);
    }

    render_status_bar(frame, app, chunks[2]);
}

fn block_style(focused: bool) -> (Style, Style) {
    if focused {
        (
            Style::default().fg(ACCENT),
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        (
            Style::default().fg(SECONDARY),
            Style::default().fg(SECONDARY),
        )
    }
}

/// Render the query input
fn render_query(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Query;
    let (border, title) = block_style(focused);

    let block = Block::default()
        .title(format!(" Molsearch :: {} ", app.backend))
        .title_style(title)
        .borders(Borders::ALL)
        .border_style(border);

    let line = if focused {
        let (before, after) = app.query_parts();
        Line::from(format!("{}|{}", before, after))
    } else if app.page.borrow().query.is_empty() {
        Line::from(Span::styled(
            "SMILES or name, Enter to search",
            Style::default().fg(DIM),
        ))
    } else {
        Line::from(app.page.borrow().query.clone())
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Render the options panel
fn render_options(frame: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == Focus::Options;
    let (border, title) = block_style(focused);
    let page = app.page.borrow();

    let block = Block::default()
        .title(format!(" Options ({}) ", page.fields.len()))
        .title_style(title)
        .borders(Borders::ALL)
        .border_style(border);

    let items: Vec<ListItem> = page
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            let label = match field.value.as_deref() {
                None => format!("[ ] {}", field.name),
                Some(TOGGLE_ON) => format!("[x] {}", field.name),
                Some(value) => format!("[=] {} = {}", field.name, value),
            };
            let style = if focused && idx == app.option_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else if field.value.is_some() {
                Style::default().fg(SUCCESS)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(Span::styled(label, style)))
        })
        .collect();

    let list = if items.is_empty() {
        let placeholder = ListItem::new(Line::from(Span::styled(
            "  No options",
            Style::default().fg(DIM),
        )));
        List::new(vec![placeholder]).block(block)
    } else {
        List::new(items).block(block)
    };

    frame.render_widget(list, area);
}

/// Loading indicator, result card, error slot or placeholder, per the page
fn render_result_area(frame: &mut Frame, app: &App, area: Rect) {
    let page = app.page.borrow();

    if page.loading {
        let block = Block::default()
            .title(" Searching ")
            .title_style(Style::default().fg(HIGHLIGHT))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SECONDARY));
        let line = Line::from(vec![
            Span::styled(
                app.spinner_frame().to_string(),
                Style::default().fg(ACCENT),
            ),
            Span::raw(" Waiting for the backend..."),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), area);
    } else if page.result {
        render_card(frame, &page, area);
    } else if let Some(message) = page.error.as_deref() {
        let block = Block::default()
            .title(" Error ")
            .title_style(Style::default().fg(FAILURE).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(FAILURE));
        let paragraph = Paragraph::new(message)
            .block(block)
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(FAILURE));
        frame.render_widget(paragraph, area);
    } else {
        let block = Block::default()
            .title(" Result ")
            .title_style(Style::default().fg(SECONDARY))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(SECONDARY));
        let paragraph = Paragraph::new(Span::styled(
            "Type a structure (or draw one into the sketch file) and press Enter",
            Style::default().fg(DIM),
        ))
        .block(block)
        .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }
}

/// Render the four result slots
fn render_card(frame: &mut Frame, page: &Page, area: Rect) {
    let block = Block::default()
        .title(" Best match ")
        .title_style(Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUCCESS));

    let label = Style::default().fg(ACCENT).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("SMILES    ", label),
            Span::raw(page.slot(ResultSlot::Smiles).to_string()),
        ]),
        Line::from(vec![
            Span::styled("Distance  ", label),
            Span::raw(page.slot(ResultSlot::Distance).to_string()),
        ]),
        Line::from(""),
        Line::from(Span::styled("Properties", label)),
    ];
    for row in fragment_text(page.slot(ResultSlot::Properties)).lines() {
        lines.push(Line::from(format!("  {}", row)));
    }

    let svg = page.slot(ResultSlot::Graphic);
    if !svg.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Depiction: {} bytes of SVG (Ctrl+S to save)", svg.len()),
            Style::default().fg(DIM),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Render the status bar
fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let state_indicator = match app.state() {
        UiState::Idle => Span::styled(" IDLE ", Style::default().bg(ACCENT).fg(Color::Black)),
        UiState::Loading => {
            Span::styled(" LOADING ", Style::default().bg(HIGHLIGHT).fg(Color::Black))
        }
        UiState::Succeeded => Span::styled(" OK ", Style::default().bg(SUCCESS).fg(Color::Black)),
        UiState::Failed => Span::styled(" ERROR ", Style::default().bg(FAILURE).fg(Color::Black)),
    };

    let help_text = match app.focus {
        Focus::Query => "Enter:search  Tab:options  Ctrl+O:panel  Ctrl+S:save svg  Esc:quit",
        Focus::Options => "j/k:nav  Space:toggle  Tab:query  Enter:search  Esc:quit",
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let line = Line::from(vec![
        state_indicator,
        Span::raw(" "),
        Span::styled(help_text, Style::default().fg(DIM)),
        Span::raw(" "),
        Span::styled(status, Style::default().fg(HIGHLIGHT)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use molsearch_core::{Distance, MoleculeResult, NothingDrawn};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;
    use crate::tui::app::SessionEvent;

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::new(Box::new(NothingDrawn), "http://test", PathBuf::from("out.svg"))
    }

    #[test]
    fn test_renders_result_card() {
        let mut app = app();
        let pending = app.begin_search();
        assert!(screen(&app).contains("Waiting for the backend"));

        app.apply(SessionEvent::SearchFinished {
            seq: pending.seq,
            outcome: Ok(MoleculeResult {
                properties_html: "<table><tr><td>MW</td><td>46.07</td></tr></table>".to_string(),
                smiles: "CCO".to_string(),
                origin_distance: Distance::Number(0.25),
                svg: "<svg/>".to_string(),
            }),
        });

        let text = screen(&app);
        assert!(text.contains("Best match"));
        assert!(text.contains("CCO"));
        assert!(text.contains("0.25"));
        assert!(text.contains("MW  46.07"));
        assert!(!text.contains("Waiting for the backend"));
    }

    #[test]
    fn test_renders_options_panel() {
        let mut app = app();
        app.apply(SessionEvent::OptionsLoaded(Ok(vec!["LogP".to_string()])));
        app.toggle_options_panel();
        app.toggle_selected_option();

        let text = screen(&app);
        assert!(text.contains("Options (1)"));
        assert!(text.contains("[x] LogP"));
    }
}
