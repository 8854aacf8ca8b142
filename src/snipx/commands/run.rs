use crate::commands::helpers::resolve_snippet;
use crate::commands::{CmdMessage, CmdResult, MessageLevel};
use crate::dispatch::{check_mode, execute_snippet, Execution};
use crate::error::{Result, SnipxError};
use crate::imports::{imported_names, resolve_imports};
use crate::registry::{ExecutionError, ExecutionModeRegistry};
use crate::store::{SnippetStore, StorageBackend};

/// Execute a snippet with its own mode. Import problems become warnings;
/// execution failures become error messages on the result.
pub fn run<B: StorageBackend>(
    store: &SnippetStore<B>,
    registry: &ExecutionModeRegistry,
    selector: &str,
) -> Result<CmdResult> {
    let snippet = resolve_snippet(store, selector)?;
    let lookup = |name: &str| store.get_snippet_by_name(name, None).map(|s| s.code.clone());
    let outcome = execute_snippet(
        registry,
        &snippet.name,
        &snippet.code,
        &snippet.execution_mode,
        lookup,
    );
    Ok(report(outcome).with_affected_snippets(vec![snippet]))
}

/// Build a `CmdResult` from an execution outcome.
pub(crate) fn report(outcome: std::result::Result<Execution, ExecutionError>) -> CmdResult {
    let mut result = CmdResult::default();
    match outcome {
        Ok(execution) => {
            for error in &execution.import_errors {
                result.add_message(CmdMessage::warning(error.to_string()));
            }
            result.execution = Some(execution);
        }
        Err(ExecutionError::CompilationFailed { diagnostics }) => {
            result.add_message(CmdMessage::error("Compilation failed"));
            for diagnostic in diagnostics {
                result.add_message(CmdMessage::error(diagnostic));
            }
        }
        Err(e) => result.add_message(CmdMessage::error(e.to_string())),
    }
    result
}

/// Show a snippet's code with imports expanded, without running it.
pub fn resolve<B: StorageBackend>(
    store: &SnippetStore<B>,
    registry: &ExecutionModeRegistry,
    selector: &str,
) -> Result<CmdResult> {
    let snippet = resolve_snippet(store, selector)?;
    let lookup = |name: &str| store.get_snippet_by_name(name, None).map(|s| s.code.clone());
    let resolved = resolve_imports(&snippet.code, &snippet.name, lookup);

    let mut result = CmdResult::default();
    let names = imported_names(&snippet.code);
    if !names.is_empty() {
        result.add_message(CmdMessage::info(format!("Imports: {}", names.join(", "))));
    }
    for error in &resolved.errors {
        result.add_message(CmdMessage::warning(error.to_string()));
    }
    if let Err(e) = check_mode(registry, &snippet.execution_mode) {
        result.add_message(CmdMessage::warning(e.to_string()));
    }
    result.resolved_code = Some(resolved.code);
    Ok(result.with_affected_snippets(vec![snippet]))
}

/// Turn a failed run into an error, for callers that want `?` semantics.
pub fn into_error(result: &CmdResult) -> Option<SnipxError> {
    result
        .messages
        .iter()
        .find(|m| m.level == MessageLevel::Error)
        .map(|m| SnipxError::Api(m.content.clone()))
}
