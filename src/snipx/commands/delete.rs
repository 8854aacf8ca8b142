use crate::commands::helpers::resolve_snippets;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{SnippetStore, StorageBackend};
use uuid::Uuid;

/// Remove snippets. All selectors are resolved before anything is removed, so
/// one unknown selector leaves the store untouched.
pub fn run<B: StorageBackend, S: AsRef<str>>(
    store: &mut SnippetStore<B>,
    selectors: &[S],
) -> Result<CmdResult> {
    let resolved = resolve_snippets(store, selectors)?;
    let ids: Vec<Uuid> = resolved.iter().map(|s| s.id).collect();
    let removed = store.remove_snippets(&ids, true)?;

    let mut result = CmdResult::default();
    for snippet in &removed {
        result.add_message(CmdMessage::success(format!(
            "Snippet deleted: {}",
            snippet.name
        )));
    }
    Ok(result.with_affected_snippets(removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mem_store;

    #[test]
    fn test_delete_many() {
        let mut store = mem_store();
        store.add_snippet("", "A", None, None, false).unwrap();
        store.add_snippet("", "B", None, None, false).unwrap();
        store.add_snippet("", "C", None, None, false).unwrap();

        let result = run(&mut store, &["a", "C"]).unwrap();
        assert_eq!(result.affected_snippets.len(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.backend().save_count(), 1);
    }

    #[test]
    fn test_unknown_selector_removes_nothing() {
        let mut store = mem_store();
        store.add_snippet("", "A", None, None, false).unwrap();
        assert!(run(&mut store, &["A", "ghost"]).is_err());
        assert_eq!(store.len(), 1);
    }
}
