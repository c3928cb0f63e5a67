//! In-memory search page.
//!
//! `Page` holds everything a real page template would: the query field, the
//! options form, the loading/result/error regions. `PageHandle` is a cheap
//! clone that implements every view trait against the shared page, so the
//! components can each own a handle while a renderer reads the same state.
//! Every mutation is appended to `Page::events` in order.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::rc::Rc;

use crate::model::ResultSlot;
use crate::view::{DisplayView, ErrorView, OptionsView, QueryInput, TOGGLE_ON};

/// One control in the options form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    /// `None` = control has no value set (unticked toggle)
    pub value: Option<String>,
}

/// A visible change to the page, in the order it happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    QuerySet(String),
    ToggleAppended(String),
    OptionsOpened,
    OptionsClosed,
    LoadingShown,
    LoadingHidden,
    ScrolledToLoading,
    ResultShown,
    ResultHidden,
    SlotWritten(ResultSlot),
    ErrorShown(String),
    ErrorCleared,
}

#[derive(Debug, Default)]
pub struct Page {
    pub query: String,
    pub fields: Vec<FormField>,
    pub options_open: bool,
    pub loading: bool,
    pub result: bool,
    pub slots: HashMap<ResultSlot, String>,
    pub error: Option<String>,
    pub events: Vec<PageEvent>,
}

impl Page {
    /// Content of a result region ("" if never written)
    pub fn slot(&self, slot: ResultSlot) -> &str {
        self.slots.get(&slot).map(String::as_str).unwrap_or("")
    }

    /// Labels of the toggle controls, in form order
    pub fn labels(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Flip a toggle between ticked and unticked
    pub fn toggle_field(&mut self, index: usize) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = match field.value {
                Some(_) => None,
                None => Some(TOGGLE_ON.to_string()),
            };
        }
    }

    /// Set a control's raw value, adding the control if it does not exist yet
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        let value = Some(value.into());
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(FormField {
                name: name.to_string(),
                value,
            }),
        }
    }

    /// Count events matching a predicate
    pub fn count(&self, pred: impl Fn(&PageEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    /// Index of the first event matching a predicate
    pub fn position(&self, pred: impl Fn(&PageEvent) -> bool) -> Option<usize> {
        self.events.iter().position(pred)
    }
}

/// Shared handle onto a `Page`
#[derive(Debug, Clone, Default)]
pub struct PageHandle(Rc<RefCell<Page>>);

impl PageHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn borrow(&self) -> Ref<'_, Page> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Page> {
        self.0.borrow_mut()
    }

    fn record(&self, event: PageEvent) {
        self.0.borrow_mut().events.push(event);
    }
}

impl QueryInput for PageHandle {
    fn value(&self) -> String {
        self.borrow().query.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.borrow_mut().query = value.to_string();
        self.record(PageEvent::QuerySet(value.to_string()));
    }
}

impl OptionsView for PageHandle {
    fn append_toggle(&mut self, name: &str) {
        self.borrow_mut().fields.push(FormField {
            name: name.to_string(),
            value: None,
        });
        self.record(PageEvent::ToggleAppended(name.to_string()));
    }

    fn entries(&self) -> Vec<(String, String)> {
        self.borrow()
            .fields
            .iter()
            .filter_map(|f| f.value.clone().map(|v| (f.name.clone(), v)))
            .collect()
    }

    fn set_open(&mut self, open: bool) {
        self.borrow_mut().options_open = open;
        self.record(if open {
            PageEvent::OptionsOpened
        } else {
            PageEvent::OptionsClosed
        });
    }

    fn is_open(&self) -> bool {
        self.borrow().options_open
    }
}

impl DisplayView for PageHandle {
    fn loading_visible(&self) -> bool {
        self.borrow().loading
    }

    fn set_loading_visible(&mut self, visible: bool) {
        self.borrow_mut().loading = visible;
        self.record(if visible {
            PageEvent::LoadingShown
        } else {
            PageEvent::LoadingHidden
        });
    }

    fn result_visible(&self) -> bool {
        self.borrow().result
    }

    fn set_result_visible(&mut self, visible: bool) {
        self.borrow_mut().result = visible;
        self.record(if visible {
            PageEvent::ResultShown
        } else {
            PageEvent::ResultHidden
        });
    }

    fn write_slot(&mut self, slot: ResultSlot, fragment: &str) {
        self.borrow_mut().slots.insert(slot, fragment.to_string());
        self.record(PageEvent::SlotWritten(slot));
    }

    fn scroll_loading_into_view(&mut self) {
        self.record(PageEvent::ScrolledToLoading);
    }
}

impl ErrorView for PageHandle {
    fn show_message(&mut self, message: &str) {
        self.borrow_mut().error = Some(message.to_string());
        self.record(PageEvent::ErrorShown(message.to_string()));
    }

    fn clear(&mut self) {
        self.borrow_mut().error = None;
        self.record(PageEvent::ErrorCleared);
    }
}
