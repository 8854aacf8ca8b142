//! # Command Layer
//!
//! This module contains the **core business logic** of snipx. Each command lives in its
//! own submodule and implements plain Rust functions over the [`SnippetStore`] (and,
//! where execution is involved, the [`ExecutionModeRegistry`]).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Enforce the rules the store leaves to its callers (unique names, forbidden characters)
//! - Decide when a batch of store mutations is committed
//! - Return structured [`CmdResult`] values with affected snippets and messages
//! - Stay completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! - **Terminal I/O**: No stdout, stderr, or formatting
//! - **Argument parsing**: That's the CLI layer's job
//! - **Exit codes**: Return `Result`, let the caller decide
//!
//! ## Testing Strategy
//!
//! Most of the testing lives here. Command tests use `MemBackend` (see
//! [`crate::test_utils`]) so they never touch the filesystem.
//!
//! [`SnippetStore`]: crate::store::SnippetStore
//! [`ExecutionModeRegistry`]: crate::registry::ExecutionModeRegistry

use crate::config::SnipxConfig;
use crate::dispatch::Execution;
use crate::model::Snippet;
use serde::Serialize;

pub mod category;
pub mod config;
pub mod create;
pub mod delete;
pub mod draft;
pub mod duplicate;
pub mod export;
pub mod helpers;
pub mod import;
pub mod list;
pub mod modes;
pub mod pinning;
pub mod rename;
pub mod run;
pub mod update;
pub mod view;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// A registered execution mode, as shown to users.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ModeInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_snippets: Vec<Snippet>,
    pub listed_snippets: Vec<Snippet>,
    pub categories: Vec<String>,
    pub modes: Vec<ModeInfo>,
    pub execution: Option<Execution>,
    pub resolved_code: Option<String>,
    pub exported: Option<String>,
    pub config: Option<SnipxConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.affected_snippets = snippets;
        self
    }

    pub fn with_listed_snippets(mut self, snippets: Vec<Snippet>) -> Self {
        self.listed_snippets = snippets;
        self
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
