//! Listing, ordering, and fuzzy name search.
//!
//! Pinned snippets always come first; within each group the chosen
//! [`SortSpec`] applies. The search query matches names fuzzily: its
//! characters must appear in order, case-insensitively, with anything in
//! between (`hw` matches `HelloWorld`).

use crate::commands::CmdResult;
use crate::error::{Result, SnipxError};
use crate::model::Snippet;
use crate::naming::names_eq;
use crate::store::{SnippetStore, StorageBackend};
use regex::{Regex, RegexBuilder};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Created,
    Edited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Name,
            descending: false,
        }
    }
}

impl SortSpec {
    /// Parses `name`, `created`, `edited`, each optionally suffixed with
    /// `-asc` or `-desc`.
    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let (key, descending) = match lower.rsplit_once('-') {
            Some((key, "desc")) => (key, true),
            Some((key, "asc")) => (key, false),
            _ => (lower.as_str(), false),
        };
        let key = match key {
            "name" => SortKey::Name,
            "created" | "create" => SortKey::Created,
            "edited" | "edit" => SortKey::Edited,
            _ => return Err(SnipxError::Api(format!("Unknown sort order: {}", s))),
        };
        Ok(Self { key, descending })
    }

    pub fn compare(&self, a: &Snippet, b: &Snippet) -> Ordering {
        let ord = match self.key {
            SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortKey::Created => a.created_at.cmp(&b.created_at),
            SortKey::Edited => a.edited_at.cmp(&b.edited_at),
        };
        if self.descending {
            ord.reverse()
        } else {
            ord
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub mode: Option<String>,
}

/// Regex for a fuzzy query: each character escaped, joined by `.*`.
pub fn fuzzy_pattern(query: &str) -> Result<Regex> {
    let pattern = query
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| regex::escape(&c.to_string()))
        .collect::<Vec<_>>()
        .join(".*");
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| SnipxError::Api(format!("Invalid search: {}", e)))
}

pub fn sort_snippets(snippets: &mut [Snippet], sort: SortSpec) {
    snippets.sort_by(|a, b| b.pinned.cmp(&a.pinned).then_with(|| sort.compare(a, b)));
}

pub fn run<B: StorageBackend>(
    store: &SnippetStore<B>,
    filter: &ListFilter,
    sort: SortSpec,
) -> Result<CmdResult> {
    let matcher = match filter.search.as_deref().filter(|q| !q.trim().is_empty()) {
        Some(query) => Some(fuzzy_pattern(query)?),
        None => None,
    };

    let mut snippets: Vec<Snippet> = store
        .snippets()
        .filter(|s| matcher.as_ref().map_or(true, |re| re.is_match(&s.name)))
        .filter(|s| filter.category.as_deref().map_or(true, |c| s.in_category(c)))
        .filter(|s| {
            filter
                .mode
                .as_deref()
                .map_or(true, |m| names_eq(&s.execution_mode, m))
        })
        .cloned()
        .collect();
    sort_snippets(&mut snippets, sort);

    Ok(CmdResult::default().with_listed_snippets(snippets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::mem_store;
    use chrono::Duration;

    fn names(result: &CmdResult) -> Vec<&str> {
        result.listed_snippets.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn test_parse_sort_spec() {
        assert_eq!(SortSpec::parse("name").unwrap(), SortSpec::default());
        assert_eq!(
            SortSpec::parse("Edited-Desc").unwrap(),
            SortSpec {
                key: SortKey::Edited,
                descending: true
            }
        );
        assert_eq!(SortSpec::parse("created-asc").unwrap().key, SortKey::Created);
        assert!(SortSpec::parse("size").is_err());
    }

    #[test]
    fn test_pinned_first_then_name() {
        let mut store = mem_store();
        store.add_snippet("", "beta", None, None, false).unwrap();
        let pinned = store.add_snippet("", "zeta", None, None, false).unwrap();
        store.add_snippet("", "Alpha", None, None, false).unwrap();
        store.set_snippet_pinned(&pinned.id, true, false).unwrap();

        let result = run(&store, &ListFilter::default(), SortSpec::default()).unwrap();
        assert_eq!(names(&result), vec!["zeta", "Alpha", "beta"]);

        let desc = SortSpec::parse("name-desc").unwrap();
        let result = run(&store, &ListFilter::default(), desc).unwrap();
        assert_eq!(names(&result), vec!["zeta", "beta", "Alpha"]);
    }

    #[test]
    fn test_sort_by_time() {
        let base = chrono::Utc::now();
        let mut a = Snippet::new("a".into(), String::new());
        let mut b = Snippet::new("b".into(), String::new());
        a.created_at = base;
        a.edited_at = base + Duration::seconds(10);
        b.created_at = base + Duration::seconds(5);
        b.edited_at = base;

        let mut list = vec![a.clone(), b.clone()];
        sort_snippets(&mut list, SortSpec::parse("created").unwrap());
        assert_eq!(list[0].name, "a");
        sort_snippets(&mut list, SortSpec::parse("edited").unwrap());
        assert_eq!(list[0].name, "b");
        sort_snippets(&mut list, SortSpec::parse("edited-desc").unwrap());
        assert_eq!(list[0].name, "a");
    }

    #[test]
    fn test_fuzzy_search() {
        let mut store = mem_store();
        store.add_snippet("", "HelloWorld", None, None, false).unwrap();
        store.add_snippet("", "Howdy", None, None, false).unwrap();
        store.add_snippet("", "Other", None, None, false).unwrap();

        let filter = ListFilter {
            search: Some("hlw".into()),
            ..Default::default()
        };
        let result = run(&store, &filter, SortSpec::default()).unwrap();
        assert_eq!(names(&result), vec!["HelloWorld"]);
    }

    #[test]
    fn test_fuzzy_search_escapes_regex_chars() {
        let mut store = mem_store();
        store.add_snippet("", "a.b", None, None, false).unwrap();
        store.add_snippet("", "axb", None, None, false).unwrap();

        let filter = ListFilter {
            search: Some(".".into()),
            ..Default::default()
        };
        let result = run(&store, &filter, SortSpec::default()).unwrap();
        assert_eq!(names(&result), vec!["a.b"]);
    }

    #[test]
    fn test_filter_by_category_and_mode() {
        let mut store = mem_store();
        store.add_snippet("", "A", Some("Lua"), Some("X"), false).unwrap();
        store.add_snippet("", "B", Some("Rust"), Some("X"), false).unwrap();
        store.add_snippet("", "C", Some("Lua"), None, false).unwrap();

        let filter = ListFilter {
            category: Some("x".into()),
            mode: Some("lua".into()),
            ..Default::default()
        };
        let result = run(&store, &filter, SortSpec::default()).unwrap();
        assert_eq!(names(&result), vec!["A"]);
    }
}
