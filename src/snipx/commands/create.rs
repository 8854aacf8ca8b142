use crate::commands::helpers::{check_name, unique_snippet_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::SnipxConfig;
use crate::error::Result;
use crate::naming::names_eq;
use crate::store::{SnippetStore, StorageBackend};

/// Add a snippet. A taken name is bumped to the next free `<name>_<n>`.
pub fn run<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    config: &SnipxConfig,
    name: &str,
    code: &str,
    mode: Option<&str>,
    category: Option<&str>,
) -> Result<CmdResult> {
    check_name(config, name)?;
    let final_name = unique_snippet_name(store, config, name, None);
    let snippet = store.add_snippet(code, &final_name, mode, category, true)?;

    let mut result = CmdResult::default();
    if !name.trim().is_empty() && !names_eq(&snippet.name, name.trim()) {
        result.add_message(CmdMessage::info(format!(
            "Name '{}' is taken, using '{}'",
            name.trim(),
            snippet.name
        )));
    }
    result.add_message(CmdMessage::success(format!(
        "Snippet created: {}",
        snippet.name
    )));
    result.affected_snippets.push(snippet);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnipxError;
    use crate::test_utils::mem_store;

    #[test]
    fn test_create_persists() {
        let mut store = mem_store();
        let config = SnipxConfig::default();
        let result = run(&mut store, &config, "Hello", "return 1", Some("Lua"), None).unwrap();

        let created = &result.affected_snippets[0];
        assert_eq!(created.name, "Hello");
        assert_eq!(created.execution_mode, "Lua");
        assert_eq!(store.backend().save_count(), 1);
    }

    #[test]
    fn test_names_stay_unique() {
        let mut store = mem_store();
        let config = SnipxConfig::default();
        for _ in 0..3 {
            run(&mut store, &config, "Foo", "", None, None).unwrap();
        }
        run(&mut store, &config, "", "", None, None).unwrap();
        run(&mut store, &config, "", "", None, None).unwrap();

        let mut names: Vec<String> = store.snippets().map(|s| s.name.to_lowercase()).collect();
        assert_eq!(names, vec!["foo", "foo_1", "foo_2", "unnamed", "unnamed_1"]);
        names.dedup();
        assert_eq!(names.len(), 5);
    }

    #[test]
    fn test_non_ascii_names_collide_across_case() {
        let mut store = mem_store();
        let config = SnipxConfig::default();
        run(&mut store, &config, "café", "", None, None).unwrap();
        let result = run(&mut store, &config, "CAFÉ", "", None, None).unwrap();

        assert_eq!(result.affected_snippets[0].name, "CAFÉ_1");
        assert!(result.messages[0].content.contains("is taken"));
        assert!(store.get_snippet_by_name("cafÉ", None).is_some());
    }

    #[test]
    fn test_forbidden_chars_rejected() {
        let mut store = mem_store();
        let config = SnipxConfig::default();
        let err = run(&mut store, &config, "bad*name", "", None, None).unwrap_err();
        assert!(matches!(err, SnipxError::InvalidName { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn test_category_is_registered() {
        let mut store = mem_store();
        let config = SnipxConfig::default();
        run(&mut store, &config, "A", "", None, Some("Tools")).unwrap();
        assert!(store.has_category("tools"));
    }
}
