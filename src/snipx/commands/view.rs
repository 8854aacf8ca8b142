use crate::commands::helpers::resolve_snippets;
use crate::commands::CmdResult;
use crate::error::Result;
use crate::store::{SnippetStore, StorageBackend};

pub fn run<B: StorageBackend, S: AsRef<str>>(
    store: &SnippetStore<B>,
    selectors: &[S],
) -> Result<CmdResult> {
    let snippets = resolve_snippets(store, selectors)?;
    Ok(CmdResult::default().with_listed_snippets(snippets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mem_store;

    #[test]
    fn test_view_keeps_selector_order() {
        let mut store = mem_store();
        store.add_snippet("a", "A", None, None, false).unwrap();
        store.add_snippet("b", "B", None, None, false).unwrap();

        let result = run(&store, &["b", "a"]).unwrap();
        let codes: Vec<&str> = result.listed_snippets.iter().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["b", "a"]);
    }
}
