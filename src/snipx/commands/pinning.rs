use crate::commands::helpers::resolve_snippets;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::{SnippetStore, StorageBackend};

pub fn pin<B: StorageBackend, S: AsRef<str>>(
    store: &mut SnippetStore<B>,
    selectors: &[S],
) -> Result<CmdResult> {
    pin_state(store, selectors, true)
}

pub fn unpin<B: StorageBackend, S: AsRef<str>>(
    store: &mut SnippetStore<B>,
    selectors: &[S],
) -> Result<CmdResult> {
    pin_state(store, selectors, false)
}

fn pin_state<B: StorageBackend, S: AsRef<str>>(
    store: &mut SnippetStore<B>,
    selectors: &[S],
    pinned: bool,
) -> Result<CmdResult> {
    let resolved = resolve_snippets(store, selectors)?;
    let mut result = CmdResult::default();
    let verb = if pinned { "Pinned" } else { "Unpinned" };

    for snippet in &resolved {
        if snippet.pinned == pinned {
            result.add_message(CmdMessage::info(format!(
                "{} is already {}",
                snippet.name,
                verb.to_lowercase()
            )));
            continue;
        }
        store.set_snippet_pinned(&snippet.id, pinned, false)?;
        result.add_message(CmdMessage::success(format!("{}: {}", verb, snippet.name)));
        if let Some(updated) = store.get_snippet(&snippet.id) {
            result.affected_snippets.push(updated.clone());
        }
    }

    if store.is_dirty() {
        store.commit()?;
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mem_store;

    #[test]
    fn test_pin_and_unpin() {
        let mut store = mem_store();
        store.add_snippet("", "A", None, None, false).unwrap();
        store.add_snippet("", "B", None, None, false).unwrap();
        store.commit().unwrap();

        let result = pin(&mut store, &["A", "B"]).unwrap();
        assert_eq!(result.affected_snippets.len(), 2);
        assert!(store.snippets().all(|s| s.pinned));
        assert_eq!(store.backend().save_count(), 2);

        unpin(&mut store, &["a"]).unwrap();
        assert!(!store.get_snippet_by_name("A", None).unwrap().pinned);
    }

    #[test]
    fn test_pin_already_pinned_is_noop() {
        let mut store = mem_store();
        let s = store.add_snippet("", "A", None, None, false).unwrap();
        store.set_snippet_pinned(&s.id, true, true).unwrap();
        let saves = store.backend().save_count();

        let result = pin(&mut store, &["A"]).unwrap();
        assert!(result.affected_snippets.is_empty());
        assert_eq!(store.backend().save_count(), saves);
    }
}
