//! JSON bundles for moving snippets between stores.
//!
//! ```json
//! { "snippets": [ { "name": "...", "code": "...", "mode": "Lua", "category": "Tools" } ] }
//! ```

use crate::commands::helpers::{resolve_snippets, unique_snippet_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::SnipxConfig;
use crate::error::{Result, SnipxError};
use crate::model::{Snippet, NONE_MODE};
use crate::store::{SnippetStore, StorageBackend};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleEntry {
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_mode() -> String {
    NONE_MODE.to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bundle {
    pub snippets: Vec<BundleEntry>,
}

impl From<&Snippet> for BundleEntry {
    fn from(s: &Snippet) -> Self {
        Self {
            name: s.name.clone(),
            code: s.code.clone(),
            mode: s.execution_mode.clone(),
            category: s.category.clone(),
        }
    }
}

/// Serialize the selected snippets (all of them when `selectors` is empty).
pub fn export<B: StorageBackend, S: AsRef<str>>(
    store: &SnippetStore<B>,
    selectors: &[S],
) -> Result<CmdResult> {
    let snippets: Vec<Snippet> = if selectors.is_empty() {
        store.snippets().cloned().collect()
    } else {
        resolve_snippets(store, selectors)?
    };

    let bundle = Bundle {
        snippets: snippets.iter().map(BundleEntry::from).collect(),
    };
    let json = serde_json::to_string_pretty(&bundle).map_err(SnipxError::Serialization)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Exported {} snippet(s)",
        bundle.snippets.len()
    )));
    result.exported = Some(json);
    Ok(result.with_affected_snippets(snippets))
}

/// Add every snippet from a bundle, bumping names that are taken. Modes are
/// kept as written even if no such mode is registered here.
pub fn paste<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    config: &SnipxConfig,
    json: &str,
) -> Result<CmdResult> {
    let bundle: Bundle = serde_json::from_str(json).map_err(SnipxError::Serialization)?;
    let mut result = CmdResult::default();

    for entry in &bundle.snippets {
        let clean: String = entry
            .name
            .chars()
            .filter(|c| !config.forbidden_name_chars.contains(c))
            .collect();
        let name = unique_snippet_name(store, config, &clean, None);
        let snippet = store.add_snippet(
            &entry.code,
            &name,
            Some(entry.mode.as_str()),
            entry.category.as_deref(),
            false,
        )?;
        result.affected_snippets.push(snippet);
    }

    if !result.affected_snippets.is_empty() {
        store.commit()?;
    }
    result.add_message(CmdMessage::success(format!(
        "Pasted {} snippet(s)",
        result.affected_snippets.len()
    )));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mem_store;

    #[test]
    fn test_export_then_paste_into_other_store() {
        let mut source = mem_store();
        source
            .add_snippet("return 1", "One", Some("Lua"), Some("Nums"), false)
            .unwrap();
        source.add_snippet("2", "Two", None, None, false).unwrap();
        let exported = export(&source, &[] as &[&str]).unwrap().exported.unwrap();

        let mut target = mem_store();
        target.add_snippet("", "One", None, None, false).unwrap();
        let result = paste(&mut target, &SnipxConfig::default(), &exported).unwrap();

        let names: Vec<&str> = result.affected_snippets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["One_1", "Two"]);
        let one = &result.affected_snippets[0];
        assert_eq!(one.execution_mode, "Lua");
        assert_eq!(one.category.as_deref(), Some("Nums"));
        assert!(target.has_category("Nums"));
        assert_eq!(target.backend().save_count(), 1);
    }

    #[test]
    fn test_export_selected_only() {
        let mut store = mem_store();
        store.add_snippet("", "A", None, None, false).unwrap();
        store.add_snippet("", "B", None, None, false).unwrap();
        let json = export(&store, &["b"]).unwrap().exported.unwrap();
        let bundle: Bundle = serde_json::from_str(&json).unwrap();
        assert_eq!(bundle.snippets.len(), 1);
        assert_eq!(bundle.snippets[0].name, "B");
    }

    #[test]
    fn test_paste_strips_forbidden_chars_and_defaults() {
        let mut store = mem_store();
        let json = r#"{ "snippets": [ { "name": "st*ar" } ] }"#;
        let result = paste(&mut store, &SnipxConfig::default(), json).unwrap();
        let s = &result.affected_snippets[0];
        assert_eq!(s.name, "star");
        assert_eq!(s.execution_mode, "None");
    }

    #[test]
    fn test_paste_rejects_garbage() {
        let mut store = mem_store();
        assert!(matches!(
            paste(&mut store, &SnipxConfig::default(), "nope"),
            Err(SnipxError::Serialization(_))
        ));
    }
}
