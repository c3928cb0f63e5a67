//! Command implementations for the molsearch CLI

pub mod models;
pub mod search;

// Re-export dispatcher functions for flat access from main.rs
pub use models::run_models;
pub use search::run_search;

/// Output format for `search`
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON as the backend sent it
    Json,
    /// Bare SMILES of the best match
    Smiles,
}
