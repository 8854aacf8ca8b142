//! # Import Resolution
//!
//! Snippets can pull in other snippets' code with an `@import` directive:
//!
//! ```text
//! @import("Helpers")
//! @import('Helpers')
//! @import(Helpers)
//! @import "Helpers"
//! ```
//!
//! Each directive is replaced in place by the referenced snippet's code, with
//! that code's own directives expanded first. Names are trimmed and matched
//! case-insensitively. Every inserted block ends with a newline.
//!
//! Problems never abort resolution. The offending directive expands to nothing
//! and an [`ImportError`] is collected:
//!
//! - a directive naming the snippet being resolved (the *anchor*) is a
//!   [`ImportError::SelfImport`], at any depth;
//! - a name with no matching snippet is an [`ImportError::UnresolvedImport`];
//! - a name already being expanded further up the chain is an
//!   [`ImportError::ImportCycle`]. Importing the same snippet twice from
//!   different places is fine.

use crate::naming::names_eq;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static IMPORT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"@import\s*(?:\(\s*(?:"([^"]*)"|'([^']*)'|([^)"'\n]*))\s*\)|"([^"]*)"|'([^']*)')"#,
    )
    .expect("import pattern is valid")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Snippet '{0}' cannot import itself")]
    SelfImport(String),

    #[error("Imported snippet '{0}' not found")]
    UnresolvedImport(String),

    #[error("Import cycle: {}", .0.join(" -> "))]
    ImportCycle(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub code: String,
    pub errors: Vec<ImportError>,
}

impl Resolved {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Expand every `@import` in `code`.
///
/// `anchor` is the name of the snippet `code` belongs to (empty for unsaved
/// code). `lookup` maps a snippet name to its raw code.
pub fn resolve_imports<F>(code: &str, anchor: &str, lookup: F) -> Resolved
where
    F: Fn(&str) -> Option<String>,
{
    let mut resolver = Resolver {
        anchor,
        lookup: &lookup,
        stack: Vec::new(),
        errors: Vec::new(),
    };
    let code = resolver.expand(code);
    Resolved {
        code,
        errors: resolver.errors,
    }
}

/// Names referenced by `@import` directives in `code`, in order of appearance.
pub fn imported_names(code: &str) -> Vec<String> {
    IMPORT
        .captures_iter(code)
        .filter_map(|caps| directive_name(&caps))
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}

fn directive_name<'t>(caps: &regex::Captures<'t>) -> Option<&'t str> {
    (1..=5).find_map(|i| caps.get(i)).map(|m| m.as_str())
}

struct Resolver<'a, F> {
    anchor: &'a str,
    lookup: &'a F,
    stack: Vec<String>,
    errors: Vec<ImportError>,
}

impl<F> Resolver<'_, F>
where
    F: Fn(&str) -> Option<String>,
{
    fn expand(&mut self, code: &str) -> String {
        let mut out = String::with_capacity(code.len());
        let mut last = 0;

        for caps in IMPORT.captures_iter(code) {
            let Some(whole) = caps.get(0) else { continue };
            out.push_str(&code[last..whole.start()]);
            let name = directive_name(&caps).unwrap_or_default();
            out.push_str(&self.substitute(name));
            last = whole.end();
        }

        out.push_str(&code[last..]);
        out
    }

    fn substitute(&mut self, raw: &str) -> String {
        let name = raw.trim();
        if name.is_empty() {
            return String::new();
        }

        if names_eq(name, self.anchor) {
            self.fail(ImportError::SelfImport(name.to_string()));
            return String::new();
        }

        if self.stack.iter().any(|n| names_eq(n, name)) {
            let mut chain = self.stack.clone();
            chain.push(name.to_string());
            self.fail(ImportError::ImportCycle(chain));
            return String::new();
        }

        let Some(code) = (self.lookup)(name) else {
            self.fail(ImportError::UnresolvedImport(name.to_string()));
            return String::new();
        };

        self.stack.push(name.to_string());
        let mut expanded = self.expand(&code);
        self.stack.pop();

        if !expanded.ends_with('\n') {
            expanded.push('\n');
        }
        expanded
    }

    fn fail(&mut self, error: ImportError) {
        log::error!("{}", error);
        self.errors.push(error);
    }
}
