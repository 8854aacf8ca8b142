use crate::commands::helpers::{check_name, resolve_snippet, unique_snippet_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::SnipxConfig;
use crate::error::Result;
use crate::store::{SnippetStore, StorageBackend};

/// Rename a snippet. The new name is bumped if another snippet holds it; the
/// snippet's own current name never counts as taken.
pub fn run<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    config: &SnipxConfig,
    selector: &str,
    new_name: &str,
) -> Result<CmdResult> {
    let snippet = resolve_snippet(store, selector)?;
    check_name(config, new_name)?;

    let final_name = unique_snippet_name(store, config, new_name, Some(snippet.id));
    let mut result = CmdResult::default();

    if final_name == snippet.name {
        result.add_message(CmdMessage::info(format!(
            "Snippet already named {}",
            snippet.name
        )));
        return Ok(result);
    }

    store.set_snippet_name(&snippet.id, &final_name, true)?;
    result.add_message(CmdMessage::success(format!(
        "Renamed {} to {}",
        snippet.name, final_name
    )));
    if let Some(updated) = store.get_snippet(&snippet.id) {
        result.affected_snippets.push(updated.clone());
    }
    Ok(result)
}
