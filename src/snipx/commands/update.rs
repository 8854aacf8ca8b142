use crate::commands::helpers::resolve_snippet;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, SnipxError};
use crate::model::{is_none_mode, NONE_MODE};
use crate::naming::names_eq;
use crate::registry::{ExecutionError, ExecutionModeRegistry};
use crate::store::{SnippetStore, StorageBackend};

pub fn set_code<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    selector: &str,
    code: &str,
) -> Result<CmdResult> {
    let snippet = resolve_snippet(store, selector)?;
    store.set_snippet_code(&snippet.id, code, true)?;
    finish(store, &snippet.id, format!("Updated code of {}", snippet.name))
}

/// Set a snippet's execution mode. Only registered modes (or `None`) are
/// accepted; the registered spelling is stored.
pub fn set_mode<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    registry: &ExecutionModeRegistry,
    selector: &str,
    mode: &str,
) -> Result<CmdResult> {
    let snippet = resolve_snippet(store, selector)?;
    let mode = canonical_mode(registry, mode)?;
    store.set_snippet_mode(&snippet.id, &mode, true)?;
    finish(
        store,
        &snippet.id,
        format!("Mode of {} set to {}", snippet.name, mode),
    )
}

/// Put a snippet in a category, creating it if needed. `None` clears it.
pub fn set_category<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    selector: &str,
    category: Option<&str>,
) -> Result<CmdResult> {
    let snippet = resolve_snippet(store, selector)?;
    let category = category.map(str::trim).filter(|c| !c.is_empty());

    // Reuse the existing spelling of a known category.
    let category = category.map(|c| {
        store
            .categories()
            .iter()
            .find(|known| names_eq(known, c))
            .cloned()
            .unwrap_or_else(|| c.to_string())
    });

    store.set_snippet_category(&snippet.id, category.as_deref(), true)?;
    let message = match &category {
        Some(c) => format!("Moved {} to {}", snippet.name, c),
        None => format!("Cleared category of {}", snippet.name),
    };
    finish(store, &snippet.id, message)
}

pub fn canonical_mode(registry: &ExecutionModeRegistry, mode: &str) -> Result<String> {
    if mode.trim().is_empty() || is_none_mode(mode) {
        return Ok(NONE_MODE.to_string());
    }
    registry.get(mode).map(|m| m.name.clone()).ok_or_else(|| {
        SnipxError::Api(ExecutionError::UnknownMode(mode.to_string()).to_string())
    })
}

fn finish<B: StorageBackend>(
    store: &SnippetStore<B>,
    id: &uuid::Uuid,
    message: String,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(message));
    if let Some(updated) = store.get_snippet(id) {
        result.affected_snippets.push(updated.clone());
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{echo_registry, mem_store};

    #[test]
    fn test_set_code() {
        let mut store = mem_store();
        store.add_snippet("old", "A", None, None, false).unwrap();
        let result = set_code(&mut store, "a", "new").unwrap();
        assert_eq!(result.affected_snippets[0].code, "new");
        assert_eq!(store.backend().save_count(), 1);
    }

    #[test]
    fn test_set_mode_uses_registered_spelling() {
        let mut store = mem_store();
        let registry = echo_registry();
        store.add_snippet("", "A", None, None, false).unwrap();

        let result = set_mode(&mut store, &registry, "A", "ECHO").unwrap();
        assert_eq!(result.affected_snippets[0].execution_mode, "Echo");

        let result = set_mode(&mut store, &registry, "A", "none").unwrap();
        assert_eq!(result.affected_snippets[0].execution_mode, "None");
    }

    #[test]
    fn test_set_mode_rejects_unknown() {
        let mut store = mem_store();
        let registry = echo_registry();
        store.add_snippet("", "A", Some("Echo"), None, false).unwrap();

        assert!(set_mode(&mut store, &registry, "A", "Cobol").is_err());
        assert_eq!(
            store.get_snippet_by_name("A", None).unwrap().execution_mode,
            "Echo"
        );
    }

    #[test]
    fn test_set_category_reuses_existing_spelling() {
        let mut store = mem_store();
        store.add_category("Tools", false).unwrap();
        store.add_snippet("", "A", None, None, false).unwrap();

        let result = set_category(&mut store, "A", Some("tools")).unwrap();
        assert_eq!(result.affected_snippets[0].category.as_deref(), Some("Tools"));
        assert_eq!(store.categories().len(), 1);

        let result = set_category(&mut store, "A", None).unwrap();
        assert!(result.affected_snippets[0].category.is_none());
    }
}
