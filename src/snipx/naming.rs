//! Name generation and validation for snippets and categories.
//!
//! Snippet and category names share the same collision scheme: when a name is
//! taken, a numeric `_<n>` suffix is appended (or bumped, if the candidate
//! already carries one) until a free name is found.
//!
//! ```
//! use snipx::naming::{names_eq, next_available_name};
//!
//! let taken = ["Foo", "Foo_1"];
//! let exists = |n: &str| taken.iter().any(|t| names_eq(t, n));
//! assert_eq!(next_available_name("Foo", 30, exists), "Foo_2");
//! assert_eq!(next_available_name("Bar", 30, exists), "Bar");
//! ```

use crate::error::{Result, SnipxError};
use crate::model::DEFAULT_NAME;
use once_cell::sync::Lazy;
use regex::Regex;

pub const NAME_MAX_LENGTH: usize = 30;
pub const NAME_SEPARATOR: char = '_';

static SUFFIXED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)_(\d+)$").expect("suffix pattern is valid"));

/// Case-insensitive name comparison with full Unicode case folding, so
/// "café" and "CAFÉ" name the same snippet.
pub fn names_eq(a: &str, b: &str) -> bool {
    a == b
        || a.chars()
            .flat_map(char::to_lowercase)
            .eq(b.chars().flat_map(char::to_lowercase))
}

/// Returns `candidate` if it is free, otherwise the first `<base>_<n>` that is.
///
/// Empty candidates become [`DEFAULT_NAME`] and anything longer than
/// `max_len` characters is cut down first. The result only depends on the
/// `exists` predicate, so calling twice against the same state yields the
/// same name.
pub fn next_available_name<F>(candidate: &str, max_len: usize, exists: F) -> String
where
    F: Fn(&str) -> bool,
{
    let mut name: String = if candidate.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        candidate.to_string()
    };

    if name.chars().count() > max_len {
        name = name.chars().take(max_len).collect();
    }

    if !exists(&name) {
        return name;
    }

    let (mut base, mut counter) = match SUFFIXED.captures(&name) {
        Some(caps) => (
            caps[1].to_string(),
            caps[2].parse::<u64>().unwrap_or(0),
        ),
        None => (name.clone(), 0),
    };

    loop {
        counter = match counter.checked_add(1) {
            Some(n) => n,
            // Suffix already at the ceiling: count again on top of the whole name.
            None => {
                base = name.clone();
                1
            }
        };
        let next = format!("{}{}{}", base, NAME_SEPARATOR, counter);
        if !exists(&next) {
            return next;
        }
    }
}

/// Characters from `forbidden` that appear in `name`, in order of first use.
pub fn forbidden_chars_in(name: &str, forbidden: &[char]) -> Vec<char> {
    let mut found = Vec::new();
    for ch in name.chars() {
        if forbidden.contains(&ch) && !found.contains(&ch) {
            found.push(ch);
        }
    }
    found
}

/// Rejects names that contain any of the `forbidden` characters.
pub fn validate_name(name: &str, forbidden: &[char]) -> Result<()> {
    let chars = forbidden_chars_in(name, forbidden);
    if chars.is_empty() {
        Ok(())
    } else {
        Err(SnipxError::InvalidName {
            name: name.to_string(),
            chars,
        })
    }
}
