//! View handles the components drive.
//!
//! Each component gets its handle at construction, so nothing here assumes a
//! live rendering surface. The TUI, the one-shot CLI and the tests all plug in
//! their own implementations.

use crate::model::ResultSlot;

/// The free-text structure input
pub trait QueryInput {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
}

/// The structure-drawing widget. Returns "" when nothing is drawn.
pub trait StructureSource {
    fn structure(&self) -> String;
}

impl<F> StructureSource for F
where
    F: Fn() -> String,
{
    fn structure(&self) -> String {
        self()
    }
}

/// A drawing widget that never has anything drawn
#[derive(Debug, Clone, Copy, Default)]
pub struct NothingDrawn;

impl StructureSource for NothingDrawn {
    fn structure(&self) -> String {
        String::new()
    }
}

/// Value a ticked toggle reports, same as an HTML checkbox without a value attribute
pub const TOGGLE_ON: &str = "on";

/// The dynamic filter form
pub trait OptionsView {
    /// Append one toggle control labelled `name`
    fn append_toggle(&mut self, name: &str);

    /// Current form entries as `(name, raw value)`, in form order.
    /// Controls without a value are not listed.
    fn entries(&self) -> Vec<(String, String)>;

    fn set_open(&mut self, open: bool);

    fn is_open(&self) -> bool;
}

/// Loading indicator plus result card
pub trait DisplayView {
    fn loading_visible(&self) -> bool;
    fn set_loading_visible(&mut self, visible: bool);

    fn result_visible(&self) -> bool;
    fn set_result_visible(&mut self, visible: bool);

    /// Replace the content of one result region with a backend fragment
    fn write_slot(&mut self, slot: ResultSlot, fragment: &str);

    fn scroll_loading_into_view(&mut self) {}
}

/// The single error slot
pub trait ErrorView {
    fn show_message(&mut self, message: &str);
    fn clear(&mut self);
}
