//! Options panel: one toggle per property name fetched at startup.

use tracing::debug;

use crate::model::{OptionMap, OptionValue};
use crate::view::{OptionsView, TOGGLE_ON};

pub struct OptionsPanel {
    view: Box<dyn OptionsView>,
    controls: usize,
}

impl OptionsPanel {
    pub fn new(view: Box<dyn OptionsView>) -> Self {
        Self { view, controls: 0 }
    }

    /// Append one toggle per name, in order.
    ///
    /// Names are not deduplicated, and a second call appends after the first.
    pub fn initialize<S: AsRef<str>>(&mut self, names: &[S]) {
        for name in names {
            self.view.append_toggle(name.as_ref());
            self.controls += 1;
        }
        debug!(added = names.len(), total = self.controls, "options panel initialized");
    }

    /// Serialize the current selections.
    ///
    /// `"on"` becomes `true`, anything else is passed through as text.
    /// Controls without a value are left out, so absence means "not selected".
    pub fn collect(&self) -> OptionMap {
        self.view
            .entries()
            .into_iter()
            .map(|(name, value)| {
                let value = if value == TOGGLE_ON {
                    OptionValue::Flag(true)
                } else {
                    OptionValue::Text(value)
                };
                (name, value)
            })
            .collect()
    }

    pub fn open(&mut self) {
        self.view.set_open(true);
    }

    pub fn close(&mut self) {
        self.view.set_open(false);
    }

    pub fn toggle(&mut self) {
        if self.view.is_open() {
            self.close();
        } else {
            self.open();
        }
    }

    pub fn is_open(&self) -> bool {
        self.view.is_open()
    }

    /// Number of controls appended so far
    pub fn len(&self) -> usize {
        self.controls
    }

    pub fn is_empty(&self) -> bool {
        self.controls == 0
    }
}
