//! # Execution Dispatch
//!
//! The path from a snippet's raw text to results:
//!
//! 1. reject the `None` mode or a mode nobody registered (nothing changes);
//! 2. make sure the code ends with a newline;
//! 3. expand `@import` directives, anchored on the snippet's own name;
//! 4. hand the expanded text to the mode's executor.
//!
//! Import problems do not stop execution; they travel alongside the results
//! in [`Execution::import_errors`].

use crate::imports::{resolve_imports, ImportError};
use crate::model::is_none_mode;
use crate::registry::{ExecutionError, ExecutionModeRegistry};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Execution {
    pub results: Vec<Value>,
    pub import_errors: Vec<ImportError>,
}

/// Check that `mode` can run anything at all.
pub fn check_mode(registry: &ExecutionModeRegistry, mode: &str) -> Result<(), ExecutionError> {
    if is_none_mode(mode) {
        return Err(ExecutionError::SentinelModeSelected);
    }
    if !registry.has(mode) {
        return Err(ExecutionError::UnknownMode(mode.to_string()));
    }
    Ok(())
}

/// Run `code` (belonging to the snippet called `name`) with `mode`.
///
/// `lookup` maps snippet names to raw code for import resolution.
pub fn execute_snippet<F>(
    registry: &ExecutionModeRegistry,
    name: &str,
    code: &str,
    mode: &str,
    lookup: F,
) -> Result<Execution, ExecutionError>
where
    F: Fn(&str) -> Option<String>,
{
    check_mode(registry, mode)?;

    let mut source = code.to_string();
    if !source.ends_with('\n') {
        source.push('\n');
    }

    let resolved = resolve_imports(&source, name, lookup);
    log::debug!(
        "Executing '{}' with mode '{}' ({} import error(s))",
        name,
        mode,
        resolved.errors.len()
    );

    let results = registry.execute(&resolved.code, mode)?;
    Ok(Execution {
        results,
        import_errors: resolved.errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ExecutionMode;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording_registry() -> (ExecutionModeRegistry, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let mut registry = ExecutionModeRegistry::new();
        registry.register(ExecutionMode::from_fn("Echo", move |code| {
            sink.borrow_mut().push(code.to_string());
            Ok(vec![json!(code)])
        }));
        (registry, seen)
    }

    fn no_snippets(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_sentinel_mode_is_rejected() {
        let (registry, seen) = recording_registry();
        assert_eq!(
            execute_snippet(&registry, "A", "x", "None", no_snippets),
            Err(ExecutionError::SentinelModeSelected)
        );
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let (registry, seen) = recording_registry();
        assert_eq!(
            execute_snippet(&registry, "A", "x", "Cobol", no_snippets),
            Err(ExecutionError::UnknownMode("Cobol".into()))
        );
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_mode_errors_share_wording() {
        let sentinel = ExecutionError::SentinelModeSelected.to_string();
        let unknown = ExecutionError::UnknownMode("Cobol".into()).to_string();
        assert_eq!(unknown, "Please select a valid execution mode! (unknown: Cobol)");
        assert!(unknown.starts_with(&sentinel));
    }

    #[test]
    fn test_code_gets_trailing_newline() {
        let (registry, seen) = recording_registry();
        execute_snippet(&registry, "A", "x", "echo", no_snippets).unwrap();
        assert_eq!(seen.borrow()[0], "x\n");
    }

    #[test]
    fn test_imports_are_expanded_before_execution() {
        let (registry, _) = recording_registry();
        let lookup = |name: &str| (name == "B").then(|| "b".to_string());
        let run = execute_snippet(&registry, "A", "@import(\"B\")\nx", "Echo", lookup).unwrap();
        assert_eq!(run.results, vec![json!("b\n\nx\n")]);
        assert!(run.import_errors.is_empty());
    }

    #[test]
    fn test_import_errors_travel_with_results() {
        let (registry, _) = recording_registry();
        let run =
            execute_snippet(&registry, "A", "@import(A)\n@import(Z)", "Echo", no_snippets).unwrap();
        assert_eq!(run.results, vec![json!("\n\n")]);
        assert_eq!(
            run.import_errors,
            vec![
                ImportError::SelfImport("A".into()),
                ImportError::UnresolvedImport("Z".into())
            ]
        );
    }
}
