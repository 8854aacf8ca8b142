use crate::commands::helpers::{find_category, unique_category_name};
use crate::commands::{CmdMessage, CmdResult};
use crate::config::SnipxConfig;
use crate::error::Result;
use crate::model::CategoryDeletePolicy;
use crate::store::{SnippetStore, StorageBackend};

/// Categories in case-insensitive alphabetical order.
pub fn list<B: StorageBackend>(store: &SnippetStore<B>) -> Result<CmdResult> {
    let mut categories = store.categories().to_vec();
    categories.sort_by_key(|c| c.to_lowercase());
    Ok(CmdResult::default().with_categories(categories))
}

/// Create a category. A taken name is bumped to the next free one.
pub fn add<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    config: &SnipxConfig,
    name: &str,
) -> Result<CmdResult> {
    let final_name = unique_category_name(store, config, name, None);
    store.add_category(&final_name, true)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Category created: {}",
        final_name
    )));
    Ok(result.with_categories(vec![final_name]))
}

/// Rename a category; every member follows.
pub fn rename<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    config: &SnipxConfig,
    old: &str,
    new: &str,
) -> Result<CmdResult> {
    let current = find_category(store, old)?;
    let final_name = unique_category_name(store, config, new, Some(current.as_str()));
    let mut result = CmdResult::default();

    if final_name == current {
        result.add_message(CmdMessage::info(format!(
            "Category already named {}",
            current
        )));
        return Ok(result);
    }

    let members = store.snippets().filter(|s| s.in_category(&current)).count();
    store.rename_category(&current, &final_name, true)?;
    result.add_message(CmdMessage::success(format!(
        "Renamed category {} to {} ({} snippet(s))",
        current, final_name, members
    )));
    Ok(result.with_categories(vec![final_name]))
}

/// Remove a category. Members are either kept without a category or deleted.
pub fn delete<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    name: &str,
    policy: CategoryDeletePolicy,
) -> Result<CmdResult> {
    let current = find_category(store, name)?;
    let members: Vec<_> = store
        .snippets()
        .filter(|s| s.in_category(&current))
        .cloned()
        .collect();
    store.remove_category(&current, policy, true)?;

    let mut result = CmdResult::default();
    let detail = match policy {
        CategoryDeletePolicy::ClearMembers => format!("{} snippet(s) uncategorized", members.len()),
        CategoryDeletePolicy::DeleteMembers => format!("{} snippet(s) deleted", members.len()),
    };
    result.add_message(CmdMessage::success(format!(
        "Category deleted: {} ({})",
        current, detail
    )));
    Ok(result.with_affected_snippets(members))
}
