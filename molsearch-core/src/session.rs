//! Search session controller
//!
//! Drives the page through `Idle → Loading → Succeeded | Failed`, builds the
//! request from the drawing widget, the query field and the options panel,
//! and routes each outcome to the display or the error channel.
//!
//! Submitting is split in two so a caller can keep the UI responsive while a
//! request is in flight:
//!
//! ```text
//! begin_submit() ─► PendingSearch { seq, request } ─► backend.search() ─► complete_search(seq, outcome)
//! ```
//!
//! Every submit takes a new sequence number. Only the response for the latest
//! one is applied; anything older is dropped, so a slow first search can never
//! overwrite the result of a later one.

use tracing::{debug, info};

use crate::client::SearchBackend;
use crate::display::MoleculeDisplay;
use crate::error::SearchFailure;
use crate::error_channel::ErrorChannel;
use crate::model::{MoleculeResult, SearchRequest, UiState};
use crate::options::OptionsPanel;
use crate::page::PageHandle;
use crate::view::{DisplayView, ErrorView, OptionsView, QueryInput, StructureSource};

/// View handles a session is wired to
pub struct SessionViews {
    pub query: Box<dyn QueryInput>,
    pub structure: Box<dyn StructureSource>,
    pub options: Box<dyn OptionsView>,
    pub display: Box<dyn DisplayView>,
    pub errors: Box<dyn ErrorView>,
}

impl SessionViews {
    /// Wire every region to one in-memory page
    pub fn from_page(page: &PageHandle, structure: Box<dyn StructureSource>) -> Self {
        Self {
            query: Box::new(page.clone()),
            structure,
            options: Box::new(page.clone()),
            display: Box::new(page.clone()),
            errors: Box::new(page.clone()),
        }
    }
}

/// A submitted search waiting for its response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSearch {
    pub seq: u64,
    pub request: SearchRequest,
}

/// What happened to a response handed to [`SearchSession::complete_search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// It was the latest search; the page now shows its outcome
    Applied,
    /// A newer search was issued (or this one was already settled)
    Discarded,
}

pub struct SearchSession {
    query: Box<dyn QueryInput>,
    structure: Box<dyn StructureSource>,
    options: OptionsPanel,
    display: MoleculeDisplay,
    errors: ErrorChannel,
    state: UiState,
    /// Last sequence number handed out
    issued: u64,
    /// Sequence number whose response is still expected
    awaiting: Option<u64>,
}

impl SearchSession {
    pub fn new(views: SessionViews) -> Self {
        Self {
            query: views.query,
            structure: views.structure,
            options: OptionsPanel::new(views.options),
            display: MoleculeDisplay::new(views.display),
            errors: ErrorChannel::new(views.errors),
            state: UiState::Idle,
            issued: 0,
            awaiting: None,
        }
    }

    /// Fetch option names once and build the panel from them
    pub async fn bootstrap<B>(&mut self, backend: &B)
    where
        B: SearchBackend + ?Sized,
    {
        let outcome = backend.fetch_models().await;
        self.apply_options(outcome);
    }

    /// Handle the `/models` outcome. Failure is surfaced but leaves the
    /// session usable with an empty option set.
    ///
    /// The bootstrap races submits: a failure only moves the page to `Failed`
    /// from `Idle` or `Failed`. While a search is pending or a result is
    /// shown, the message is displayed and loading and the card stay as they are.
    pub fn apply_options(&mut self, outcome: Result<Vec<String>, SearchFailure>) {
        match outcome {
            Ok(names) => {
                info!(count = names.len(), "search options loaded");
                self.options.initialize(names.as_slice());
            }
            Err(failure) => {
                let settled = matches!(self.state, UiState::Idle | UiState::Failed);
                if settled && self.awaiting.is_none() {
                    self.transition(UiState::Failed);
                }
                self.errors.display_error(&failure);
            }
        }
    }

    /// Submit, wait for the backend, and apply the outcome
    pub async fn submit<B>(&mut self, backend: &B) -> Completion
    where
        B: SearchBackend + ?Sized,
    {
        let pending = self.begin_submit();
        let outcome = backend.search(&pending.request).await;
        self.complete_search(pending.seq, outcome)
    }

    /// Synchronous half of a submit: reset the page, show loading, build the request
    pub fn begin_submit(&mut self) -> PendingSearch {
        self.issued += 1;
        let seq = self.issued;
        self.awaiting = Some(seq);

        self.transition(UiState::Loading);
        self.display.scroll_loading_into_view();

        let drawn = self.structure.structure();
        if !drawn.is_empty() {
            self.query.set_value(&drawn);
        }
        let request = SearchRequest::build(drawn, self.query.value(), self.options.collect());

        info!(
            seq,
            query = %request.query,
            drawn = !request.drawn.is_empty(),
            options = request.options.len(),
            "search submitted"
        );
        PendingSearch { seq, request }
    }

    /// Apply a search outcome if `seq` is the search still being waited for
    pub fn complete_search(
        &mut self,
        seq: u64,
        outcome: Result<MoleculeResult, SearchFailure>,
    ) -> Completion {
        if self.awaiting != Some(seq) {
            debug!(seq, latest = self.issued, "discarding stale search response");
            return Completion::Discarded;
        }
        self.awaiting = None;

        match outcome {
            Ok(result) => {
                self.transition(UiState::Succeeded);
                self.display.show_result(&result);
            }
            Err(failure) => {
                self.transition(UiState::Failed);
                self.errors.display_error(&failure);
            }
        }
        Completion::Applied
    }

    /// Move to `next` and make the page match it. Regions are hidden before
    /// anything is shown, and the loading indicator is on only in `Loading`.
    fn transition(&mut self, next: UiState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;

        if !next.visibility().error {
            self.errors.clear_error_message();
        }
        self.display.render(next);
    }

    pub fn state(&self) -> UiState {
        self.state
    }

    /// Sequence number of the most recent submit (0 before the first)
    pub fn latest_seq(&self) -> u64 {
        self.issued
    }

    /// True while the latest search has not been answered
    pub fn in_flight(&self) -> bool {
        self.awaiting.is_some()
    }

    pub fn options(&self) -> &OptionsPanel {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut OptionsPanel {
        &mut self.options
    }

    pub fn display(&self) -> &MoleculeDisplay {
        &self.display
    }

    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }
}
