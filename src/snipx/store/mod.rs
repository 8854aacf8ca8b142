//! # Storage Layer
//!
//! The store keeps the whole snippet collection in memory and persists it as a
//! single versioned record. Reads never touch the backend; writes go out on
//! commit.
//!
//! ## Layers
//!
//! - [`snippet_store::SnippetStore`]: the live collection (snippets, categories,
//!   draft) and every rule that governs it.
//! - [`backend::StorageBackend`]: raw load/save of the record.
//!   - [`fs_backend::FsBackend`]: `data.json` in the data directory, written
//!     atomically.
//!   - [`mem_backend::MemBackend`]: for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── data.json     # { version, categories, new_snippet, snippets }
//! └── config.json   # Settings
//! ```

pub mod backend;
pub mod fs_backend;
pub mod mem_backend;
pub mod snippet_store;

pub use backend::StorageBackend;
pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use snippet_store::SnippetStore;
