//! molsearch-core - search session controller and backend client
//!
//! This crate provides:
//! - The search session controller (`Idle → Loading → Succeeded | Failed`)
//! - Options panel, molecule display and error channel components
//! - View-handle traits plus an in-memory page implementing all of them
//! - A reqwest client for the `/models` and `/search` endpoints
//!
//! ## Architecture
//!
//! ```text
//! StructureSource ─┐
//! QueryInput ──────┼─► SearchSession ─► SearchBackend (GET /models, POST /search)
//! OptionsPanel ────┘         │
//!                            ├─► MoleculeDisplay (loading, result card)
//!                            └─► ErrorChannel    (error slot)
//! ```

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod error_channel;
pub mod model;
pub mod options;
pub mod page;
pub mod session;
pub mod view;

pub use client::{HttpSearchClient, SearchBackend, JSON_CONTENT_TYPE};
pub use config::ClientConfig;
pub use display::MoleculeDisplay;
pub use error::{ConfigError, Endpoint, HttpFailure, SearchFailure, TransportFailure, TransportKind};
pub use error_channel::ErrorChannel;
pub use model::{
    Distance, MoleculeResult, OptionMap, OptionValue, ResultSlot, SearchRequest, UiState,
    Visibility,
};
pub use options::OptionsPanel;
pub use page::{FormField, Page, PageEvent, PageHandle};
pub use session::{Completion, PendingSearch, SearchSession, SessionViews};
pub use view::{
    DisplayView, ErrorView, NothingDrawn, OptionsView, QueryInput, StructureSource, TOGGLE_ON,
};
