//! # Snipx Architecture
//!
//! Snipx is a **UI-agnostic snippet library**: named pieces of code, each tagged with an
//! execution mode, that can pull in each other's code with `@import` and be run by a
//! pluggable back-end. The CLI is one client of it.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, print.rs)                     │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the store, the mode registry and the settings       │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Naming rules, batching, messages                         │
//! │  - No I/O assumptions                                       │
//! └─────────────────────────────────────────────────────────────┘
//!               │                               │
//!               ▼                               ▼
//! ┌───────────────────────────┐   ┌─────────────────────────────┐
//! │  Storage (store/)         │   │  Execution                  │
//! │  - SnippetStore           │   │  - imports → dispatch       │
//! │  - FsBackend, MemBackend  │   │  - registry ← modes/        │
//! └───────────────────────────┘   └─────────────────────────────┘
//! ```
//!
//! ## Running a snippet
//!
//! [`dispatch::execute_snippet`] rejects the `None` mode, expands imports with
//! [`imports::resolve_imports`], then calls the executor registered under the
//! snippet's mode in the [`registry::ExecutionModeRegistry`]. The registry is
//! filled at startup by the providers in [`modes`], lowest priority first.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`store`]: Snippet store and its backends
//! - [`model`]: Core data types (`Snippet`, `StoreData`)
//! - [`naming`]: `<base>_<n>` name generation and validation
//! - [`imports`]: `@import` expansion
//! - [`registry`]: Execution modes and the executor trait
//! - [`modes`]: Built-in Rust and Lua back-ends and their providers
//! - [`dispatch`]: Mode check, import expansion, execution
//! - [`config`]: Settings
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod imports;
pub mod model;
pub mod modes;
pub mod naming;
pub mod registry;
pub mod store;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
