//! The scratch snippet: unsaved code with a mode, kept across sessions.
//!
//! Running the draft uses an empty anchor, so it may import any saved snippet.

use crate::commands::helpers::{check_name, unique_snippet_name};
use crate::commands::run::report;
use crate::commands::update::canonical_mode;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::SnipxConfig;
use crate::dispatch::execute_snippet;
use crate::error::Result;
use crate::registry::ExecutionModeRegistry;
use crate::store::{SnippetStore, StorageBackend};

pub fn show<B: StorageBackend>(store: &SnippetStore<B>) -> Result<CmdResult> {
    let draft = store.draft();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!("Mode: {}", draft.mode)));
    result.resolved_code = Some(draft.code.clone());
    Ok(result)
}

pub fn set_code<B: StorageBackend>(store: &mut SnippetStore<B>, code: &str) -> Result<CmdResult> {
    store.set_draft_code(code, true)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Draft updated"));
    Ok(result)
}

pub fn set_mode<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    registry: &ExecutionModeRegistry,
    mode: &str,
) -> Result<CmdResult> {
    let mode = canonical_mode(registry, mode)?;
    store.set_draft_mode(&mode, true)?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Draft mode set to {}", mode)));
    Ok(result)
}

pub fn run<B: StorageBackend>(
    store: &SnippetStore<B>,
    registry: &ExecutionModeRegistry,
) -> Result<CmdResult> {
    let draft = store.draft();
    let lookup = |name: &str| store.get_snippet_by_name(name, None).map(|s| s.code.clone());
    Ok(report(execute_snippet(
        registry,
        "",
        &draft.code,
        &draft.mode,
        lookup,
    )))
}

/// Save the draft as a new snippet and clear its code. The mode is kept.
pub fn save<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    config: &SnipxConfig,
    name: &str,
    category: Option<&str>,
) -> Result<CmdResult> {
    check_name(config, name)?;
    let draft = store.draft().clone();
    let final_name = unique_snippet_name(store, config, name, None);
    let snippet = store.add_snippet(
        &draft.code,
        &final_name,
        Some(draft.mode.as_str()),
        category,
        false,
    )?;
    store.set_draft_code("", true)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Draft saved as {}",
        snippet.name
    )));
    result.affected_snippets.push(snippet);
    Ok(result)
}
