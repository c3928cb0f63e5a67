//! Interactive search page
//!
//! A single-screen TUI over the search session:
//! - Query input (typed structure; a sketch file, when given, takes precedence)
//! - Options panel built from the backend's `/models` list
//! - Result card, loading spinner or error, exactly one at a time
//!
//! Log output goes to ~/.molsearch/tui.log while the TUI owns the terminal.

use std::path::PathBuf;

use clap::Parser;

pub mod app;
pub mod event;
pub mod terminal;
pub mod ui;

pub use terminal::run;

#[derive(Parser, Debug)]
pub struct TuiArgs {
    /// Read the drawn structure from this file on every search
    #[arg(long, value_name = "PATH")]
    pub sketch: Option<PathBuf>,

    /// Where Ctrl+S saves the current depiction
    #[arg(long, value_name = "PATH", default_value = "molsearch-result.svg")]
    pub svg_out: PathBuf,
}
