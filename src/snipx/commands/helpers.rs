use crate::config::SnipxConfig;
use crate::error::{Result, SnipxError};
use crate::model::Snippet;
use crate::naming::{names_eq, next_available_name, validate_name};
use crate::store::{SnippetStore, StorageBackend};
use uuid::Uuid;

/// Find a snippet by name (case-insensitive) or by its full id.
pub fn resolve_snippet<B: StorageBackend>(
    store: &SnippetStore<B>,
    selector: &str,
) -> Result<Snippet> {
    if let Some(snippet) = store.get_snippet_by_name(selector, None) {
        return Ok(snippet.clone());
    }
    if let Ok(id) = Uuid::parse_str(selector) {
        if let Some(snippet) = store.get_snippet(&id) {
            return Ok(snippet.clone());
        }
    }
    Err(SnipxError::SnippetNotFound(selector.to_string()))
}

/// Resolve every selector, failing on the first unknown one. Duplicates are
/// collapsed, keeping the first occurrence.
pub fn resolve_snippets<B: StorageBackend, S: AsRef<str>>(
    store: &SnippetStore<B>,
    selectors: &[S],
) -> Result<Vec<Snippet>> {
    let mut resolved: Vec<Snippet> = Vec::new();
    for selector in selectors {
        let snippet = resolve_snippet(store, selector.as_ref())?;
        if !resolved.iter().any(|s| s.id == snippet.id) {
            resolved.push(snippet);
        }
    }
    Ok(resolved)
}

/// A free snippet name based on `candidate`. The snippet `exclude` (if any) is
/// not counted as a collision, so renaming a snippet to its own name is a
/// no-op.
pub fn unique_snippet_name<B: StorageBackend>(
    store: &SnippetStore<B>,
    config: &SnipxConfig,
    candidate: &str,
    exclude: Option<Uuid>,
) -> String {
    next_available_name(candidate.trim(), config.name_max_length, |name| {
        store
            .snippets()
            .any(|s| Some(s.id) != exclude && names_eq(&s.name, name))
    })
}

/// A free category name based on `candidate`. `exclude` names a category that
/// does not count as a collision.
pub fn unique_category_name<B: StorageBackend>(
    store: &SnippetStore<B>,
    config: &SnipxConfig,
    candidate: &str,
    exclude: Option<&str>,
) -> String {
    next_available_name(candidate.trim(), config.name_max_length, |name| {
        store.categories().iter().any(|c| {
            names_eq(c, name) && !exclude.is_some_and(|e| names_eq(c, e))
        })
    })
}

/// Reject names with forbidden characters.
pub fn check_name(config: &SnipxConfig, name: &str) -> Result<()> {
    validate_name(name, &config.forbidden_name_chars)
}

pub fn find_category<B: StorageBackend>(store: &SnippetStore<B>, name: &str) -> Result<String> {
    store
        .categories()
        .iter()
        .find(|c| names_eq(c, name))
        .cloned()
        .ok_or_else(|| SnipxError::CategoryNotFound(name.to_string()))
}
