use crate::api::SnipxApi;
use crate::config::SnipxConfig;
use crate::registry::{ExecutionMode, ExecutionModeRegistry};
use crate::store::{MemBackend, SnippetStore};
use serde_json::Value;

/// An empty store over `MemBackend`.
pub fn mem_store() -> SnippetStore<MemBackend> {
    SnippetStore::with_backend(MemBackend::new()).expect("in-memory store failed to load")
}

/// A registry holding a single `Echo` mode that returns its input.
pub fn echo_registry() -> ExecutionModeRegistry {
    let mut registry = ExecutionModeRegistry::new();
    registry.register(echo_mode());
    registry
}

pub fn echo_mode() -> ExecutionMode {
    ExecutionMode::from_fn("Echo", |code| Ok(vec![Value::String(code.to_string())]))
        .with_description("Returns the resolved code")
}

/// An API over `MemBackend` with only the `Echo` mode registered.
pub fn mem_api() -> SnipxApi<MemBackend> {
    let mut api = SnipxApi::with_providers(mem_store(), SnipxConfig::default(), Vec::new());
    api.register_mode(echo_mode());
    api
}
