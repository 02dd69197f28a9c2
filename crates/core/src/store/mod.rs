//! The external note store: read a template note, create a new note.

pub mod nb;

pub use nb::NbStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to run note store program '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read template '{identifier}': {diagnostic}")]
    Read { identifier: String, diagnostic: String },

    #[error("failed to create note '{filename}': {diagnostic}")]
    Write { filename: String, diagnostic: String },
}

impl StoreError {
    /// Text to show the user: the store's own output for read/write
    /// failures, verbatim.
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Spawn { .. } => self.to_string(),
            Self::Read { diagnostic, .. } | Self::Write { diagnostic, .. } => {
                diagnostic.clone()
            }
        }
    }
}

/// Read-by-identifier and write-by-filename against a note store.
pub trait NoteStore {
    /// Raw content of the note addressed by `identifier` (notebook prefix,
    /// folder path, id, filename or title).
    fn read_template(&self, identifier: &str) -> Result<String, StoreError>;

    /// Create a new note at `filename` with literal `content`.
    fn write_note(&self, filename: &str, content: &str) -> Result<(), StoreError>;
}
