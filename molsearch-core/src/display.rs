//! Molecule display: loading indicator and the four-slot result card.
//!
//! Show/hide calls only reach the view when its current visibility differs
//! from the target, so repeating them is free.

use crate::model::{MoleculeResult, ResultSlot, UiState};
use crate::view::DisplayView;

pub struct MoleculeDisplay {
    view: Box<dyn DisplayView>,
    /// Last result shown; superseded by the next one, never cleared
    current: Option<MoleculeResult>,
}

impl MoleculeDisplay {
    pub fn new(view: Box<dyn DisplayView>) -> Self {
        Self {
            view,
            current: None,
        }
    }

    pub fn show_loading(&mut self) {
        if !self.view.loading_visible() {
            self.view.set_loading_visible(true);
        }
    }

    pub fn hide_loading(&mut self) {
        if self.view.loading_visible() {
            self.view.set_loading_visible(false);
        }
    }

    pub fn scroll_loading_into_view(&mut self) {
        self.view.scroll_loading_into_view();
    }

    /// Hide loading, reveal the card and write all four fragments as-is
    pub fn show_result(&mut self, result: &MoleculeResult) {
        self.hide_loading();
        if !self.view.result_visible() {
            self.view.set_result_visible(true);
        }

        let distance = result.origin_distance.to_string();
        for slot in ResultSlot::ALL {
            let fragment = match slot {
                ResultSlot::Properties => result.properties_html.as_str(),
                ResultSlot::Smiles => result.smiles.as_str(),
                ResultSlot::Distance => distance.as_str(),
                ResultSlot::Graphic => result.svg.as_str(),
            };
            self.view.write_slot(slot, fragment);
        }
        self.current = Some(result.clone());
    }

    pub fn hide_result(&mut self) {
        if self.view.result_visible() {
            self.view.set_result_visible(false);
        }
    }

    /// Make loading and the card match `state`. Hides happen before shows.
    ///
    /// The card is only revealed if a result has been written to it.
    pub fn render(&mut self, state: UiState) {
        let visible = state.visibility();
        if !visible.result {
            self.hide_result();
        }
        if visible.loading {
            self.show_loading();
        } else {
            self.hide_loading();
        }
        if visible.result && self.current.is_some() && !self.view.result_visible() {
            self.view.set_result_visible(true);
        }
    }

    pub fn loading_visible(&self) -> bool {
        self.view.loading_visible()
    }

    pub fn result_visible(&self) -> bool {
        self.view.result_visible()
    }

    /// Most recent result written to the card
    pub fn current(&self) -> Option<&MoleculeResult> {
        self.current.as_ref()
    }
}
