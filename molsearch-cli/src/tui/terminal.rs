//! Terminal management and main run loop
//!
//! The session lives on this thread. Requests run as tokio tasks and report
//! back over an unbounded channel, which the loop drains before every draw.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use molsearch_core::{
    ClientConfig, HttpSearchClient, NothingDrawn, PendingSearch, SearchBackend, StructureSource,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use super::app::{App, SessionEvent};
use super::event::{handle_key, poll_event, HandleResult};
use super::{ui, TuiArgs};
use crate::sketch::FileSketchpad;

/// Redraw interval, also the spinner frame rate
const FRAME: Duration = Duration::from_millis(80);

/// Initialize the terminal for TUI mode
fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Network side of the page: spawns requests, funnels outcomes to the loop
struct Dispatcher {
    runtime: Handle,
    client: Arc<HttpSearchClient>,
    tx: UnboundedSender<SessionEvent>,
}

impl Dispatcher {
    fn fetch_options(&self) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = client.fetch_models().await;
            // Receiver only goes away when the UI has quit
            let _ = tx.send(SessionEvent::OptionsLoaded(outcome));
        });
    }

    fn search(&self, pending: PendingSearch) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        debug!(seq = pending.seq, "spawning search");
        self.runtime.spawn(async move {
            let outcome = client.search(&pending.request).await;
            let _ = tx.send(SessionEvent::SearchFinished {
                seq: pending.seq,
                outcome,
            });
        });
    }
}

/// Run the TUI application
///
/// Must be called from within a tokio runtime (the caller wraps it in
/// `block_in_place`).
pub fn run(args: TuiArgs, config: &ClientConfig) -> Result<()> {
    let client = HttpSearchClient::new(config).context("Failed to build HTTP client")?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher {
        runtime: Handle::current(),
        client: Arc::new(client),
        tx,
    };

    let structure: Box<dyn StructureSource> = match args.sketch {
        Some(path) => {
            info!("Reading drawn structure from {}", path.display());
            Box::new(FileSketchpad::new(path))
        }
        None => Box::new(NothingDrawn),
    };
    let mut app = App::new(structure, config.base_url.clone(), args.svg_out);

    // Options load in the background; searches can start before they arrive
    dispatcher.fetch_options();

    let mut terminal = init_terminal()?;
    let result = run_loop(&mut terminal, &mut app, &dispatcher, &mut rx);

    // Restore terminal (even if loop failed)
    restore_terminal(&mut terminal)?;

    result
}

/// Main event loop
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    dispatcher: &Dispatcher,
    rx: &mut UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    loop {
        while let Ok(event) = rx.try_recv() {
            app.apply(event);
        }

        app.tick = app.tick.wrapping_add(1);
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(Event::Key(key)) = poll_event(FRAME)? {
            match handle_key(app, key) {
                HandleResult::Quit => break,
                HandleResult::Continue => {}
                HandleResult::Submit => {
                    let pending = app.begin_search();
                    dispatcher.search(pending);
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
