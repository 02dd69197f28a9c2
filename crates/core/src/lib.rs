//! Core library for notegen: render a new note from a template note held by
//! an external note store.

pub mod config;
pub mod generate;
pub mod store;
pub mod templates;
pub mod vars;

pub use generate::{GenerateError, Generated, NoteRequest, assemble, generate};
pub use store::{NbStore, NoteStore, StoreError};
