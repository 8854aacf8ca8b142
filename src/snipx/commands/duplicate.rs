use crate::commands::helpers::{resolve_snippets, unique_snippet_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::SnipxConfig;
use crate::error::Result;
use crate::store::{SnippetStore, StorageBackend};

/// Clone snippets under fresh names. Code, mode and category are copied; the
/// pin is not. The store is committed once, after the last clone.
pub fn run<B: StorageBackend, S: AsRef<str>>(
    store: &mut SnippetStore<B>,
    config: &SnipxConfig,
    selectors: &[S],
) -> Result<CmdResult> {
    let originals = resolve_snippets(store, selectors)?;
    let mut result = CmdResult::default();

    let last = originals.len().saturating_sub(1);
    for (i, original) in originals.iter().enumerate() {
        let name = unique_snippet_name(store, config, &original.name, None);
        let copy = store.add_snippet(
            &original.code,
            &name,
            Some(original.execution_mode.as_str()),
            original.category.as_deref(),
            i == last,
        )?;
        result.add_message(CmdMessage::success(format!(
            "Duplicated {} as {}",
            original.name, copy.name
        )));
        result.affected_snippets.push(copy);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mem_store;

    #[test]
    fn test_duplicate_copies_content() {
        let mut store = mem_store();
        store
            .add_snippet("return 1", "Calc", Some("Lua"), Some("Math"), false)
            .unwrap();

        let result = run(&mut store, &SnipxConfig::default(), &["calc"]).unwrap();
        let copy = &result.affected_snippets[0];
        assert_eq!(copy.name, "Calc_1");
        assert_eq!(copy.code, "return 1");
        assert_eq!(copy.execution_mode, "Lua");
        assert_eq!(copy.category.as_deref(), Some("Math"));
    }

    #[test]
    fn test_duplicate_twice_and_single_commit() {
        let mut store = mem_store();
        store.add_snippet("", "A", None, None, false).unwrap();
        store.add_snippet("", "B", None, None, false).unwrap();

        run(&mut store, &SnipxConfig::default(), &["A", "B"]).unwrap();
        run(&mut store, &SnipxConfig::default(), &["A"]).unwrap();

        let names: Vec<&str> = store.snippets().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "A_1", "B_1", "A_2"]);
        assert_eq!(store.backend().save_count(), 2);
    }
}
