//! File-backed structure sketchpad.
//!
//! An external drawing tool (or `echo CCO > sketch.smi`) writes the current
//! structure to a file; every submit reads it fresh.

use std::io::ErrorKind;
use std::path::PathBuf;

use molsearch_core::StructureSource;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct FileSketchpad {
    path: PathBuf,
}

impl FileSketchpad {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StructureSource for FileSketchpad {
    /// Trimmed file contents; a missing or unreadable file means nothing is drawn
    fn structure(&self) -> String {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content.trim().to_string(),
            Err(e) if e.kind() == ErrorKind::NotFound => String::new(),
            Err(e) => {
                warn!("Failed to read sketch {}: {}", self.path.display(), e);
                String::new()
            }
        }
    }
}

/// A fixed drawing given on the command line
#[derive(Debug, Clone)]
pub struct LiteralDrawing(pub String);

impl StructureSource for LiteralDrawing {
    fn structure(&self) -> String {
        self.0.trim().to_string()
    }
}
