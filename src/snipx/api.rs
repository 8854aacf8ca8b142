//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for snipx operations, whatever the UI.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Owns the services**: the [`SnippetStore`], the [`ExecutionModeRegistry`],
//!   the mode providers and the settings are constructed once and passed by
//!   reference to each command
//! - **Dispatches** to the appropriate command function
//! - **Returns structured types** (`Result<CmdResult>`)
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Presentation concerns**: Returns data structures, not strings
//!
//! ## Generic Over StorageBackend
//!
//! `SnipxApi<B: StorageBackend>`:
//! - Production: `SnipxApi<FsBackend>`
//! - Testing: `SnipxApi<MemBackend>`
//!
//! ## Threading
//!
//! Executors are held behind `Rc`, so an API value stays on the thread that
//! built it. Hosts that share one across threads must wrap it in their own
//! lock and rebuild executors per thread.

use crate::commands;
use crate::config::SnipxConfig;
use crate::dispatch::{self, Execution};
use crate::error::Result;
use crate::model::CategoryDeletePolicy;
use crate::modes::{self, ModeProvider};
use crate::registry::{ExecutionError, ExecutionMode, ExecutionModeRegistry};
use crate::store::{SnippetStore, StorageBackend};
use std::path::PathBuf;

pub struct SnipxApi<B: StorageBackend> {
    store: SnippetStore<B>,
    registry: ExecutionModeRegistry,
    providers: Vec<ModeProvider>,
    config: SnipxConfig,
    config_dir: Option<PathBuf>,
}

impl<B: StorageBackend> SnipxApi<B> {
    /// Build an API with the built-in mode providers.
    pub fn new(store: SnippetStore<B>, config: SnipxConfig) -> Self {
        Self::with_providers(store, config, modes::builtin_providers())
    }

    /// Build an API and bootstrap the registry from `providers`.
    pub fn with_providers(
        store: SnippetStore<B>,
        config: SnipxConfig,
        providers: Vec<ModeProvider>,
    ) -> Self {
        let mut registry = ExecutionModeRegistry::new();
        modes::bootstrap(&mut registry, &providers, &config);
        Self {
            store,
            registry,
            providers,
            config,
            config_dir: None,
        }
    }

    /// Directory that `config set` writes `config.json` into.
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    pub fn store(&self) -> &SnippetStore<B> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SnippetStore<B> {
        &mut self.store
    }

    pub fn registry(&self) -> &ExecutionModeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SnipxConfig {
        &self.config
    }

    // --- Execution modes ---

    pub fn register_mode(&mut self, mode: ExecutionMode) -> bool {
        self.registry.register(mode)
    }

    pub fn unregister_mode(&mut self, name: &str) -> bool {
        self.registry.unregister(name)
    }

    pub fn has_mode(&self, name: &str) -> bool {
        self.registry.has(name)
    }

    /// Drop every mode and run the providers again with the current settings.
    /// Modes registered by hand are lost.
    pub fn reregister_modes(&mut self) {
        modes::reregister(&mut self.registry, &self.providers, &self.config);
    }

    pub fn list_modes(&self) -> Result<commands::CmdResult> {
        commands::modes::run(&self.registry)
    }

    /// Run arbitrary code as if it were the snippet `name`. Imports resolve
    /// against the store.
    pub fn execute_snippet(
        &self,
        name: &str,
        code: &str,
        mode: &str,
    ) -> std::result::Result<Execution, ExecutionError> {
        let store = &self.store;
        dispatch::execute_snippet(&self.registry, name, code, mode, |n| {
            store.get_snippet_by_name(n, None).map(|s| s.code.clone())
        })
    }

    // --- Snippets ---

    pub fn add_snippet(
        &mut self,
        name: &str,
        code: &str,
        mode: Option<&str>,
        category: Option<&str>,
    ) -> Result<commands::CmdResult> {
        let mode = mode
            .map(|m| commands::update::canonical_mode(&self.registry, m))
            .transpose()?;
        commands::create::run(
            &mut self.store,
            &self.config,
            name,
            code,
            mode.as_deref(),
            category,
        )
    }

    pub fn list_snippets(
        &self,
        filter: &ListFilter,
        sort: Option<SortSpec>,
    ) -> Result<commands::CmdResult> {
        let sort = match sort {
            Some(sort) => sort,
            None => SortSpec::parse(&self.config.default_sort)?,
        };
        commands::list::run(&self.store, filter, sort)
    }

    pub fn view_snippets<S: AsRef<str>>(&self, selectors: &[S]) -> Result<commands::CmdResult> {
        commands::view::run(&self.store, selectors)
    }

    pub fn rename_snippet(&mut self, selector: &str, new_name: &str) -> Result<commands::CmdResult> {
        commands::rename::run(&mut self.store, &self.config, selector, new_name)
    }

    pub fn set_snippet_code(&mut self, selector: &str, code: &str) -> Result<commands::CmdResult> {
        commands::update::set_code(&mut self.store, selector, code)
    }

    pub fn set_snippet_mode(&mut self, selector: &str, mode: &str) -> Result<commands::CmdResult> {
        commands::update::set_mode(&mut self.store, &self.registry, selector, mode)
    }

    pub fn set_snippet_category(
        &mut self,
        selector: &str,
        category: Option<&str>,
    ) -> Result<commands::CmdResult> {
        commands::update::set_category(&mut self.store, selector, category)
    }

    pub fn pin_snippets<S: AsRef<str>>(&mut self, selectors: &[S]) -> Result<commands::CmdResult> {
        commands::pinning::pin(&mut self.store, selectors)
    }

    pub fn unpin_snippets<S: AsRef<str>>(
        &mut self,
        selectors: &[S],
    ) -> Result<commands::CmdResult> {
        commands::pinning::unpin(&mut self.store, selectors)
    }

    pub fn delete_snippets<S: AsRef<str>>(
        &mut self,
        selectors: &[S],
    ) -> Result<commands::CmdResult> {
        commands::delete::run(&mut self.store, selectors)
    }

    pub fn duplicate_snippets<S: AsRef<str>>(
        &mut self,
        selectors: &[S],
    ) -> Result<commands::CmdResult> {
        commands::duplicate::run(&mut self.store, &self.config, selectors)
    }

    pub fn run_snippet(&self, selector: &str) -> Result<commands::CmdResult> {
        commands::run::run(&self.store, &self.registry, selector)
    }

    pub fn resolve_snippet(&self, selector: &str) -> Result<commands::CmdResult> {
        commands::run::resolve(&self.store, &self.registry, selector)
    }

    // --- Categories ---

    pub fn list_categories(&self) -> Result<commands::CmdResult> {
        commands::category::list(&self.store)
    }

    pub fn add_category(&mut self, name: &str) -> Result<commands::CmdResult> {
        commands::category::add(&mut self.store, &self.config, name)
    }

    pub fn rename_category(&mut self, old: &str, new: &str) -> Result<commands::CmdResult> {
        commands::category::rename(&mut self.store, &self.config, old, new)
    }

    pub fn delete_category(
        &mut self,
        name: &str,
        policy: CategoryDeletePolicy,
    ) -> Result<commands::CmdResult> {
        commands::category::delete(&mut self.store, name, policy)
    }

    // --- Draft ---

    pub fn show_draft(&self) -> Result<commands::CmdResult> {
        commands::draft::show(&self.store)
    }

    pub fn set_draft_code(&mut self, code: &str) -> Result<commands::CmdResult> {
        commands::draft::set_code(&mut self.store, code)
    }

    pub fn set_draft_mode(&mut self, mode: &str) -> Result<commands::CmdResult> {
        commands::draft::set_mode(&mut self.store, &self.registry, mode)
    }

    pub fn run_draft(&self) -> Result<commands::CmdResult> {
        commands::draft::run(&self.store, &self.registry)
    }

    pub fn save_draft(
        &mut self,
        name: &str,
        category: Option<&str>,
    ) -> Result<commands::CmdResult> {
        commands::draft::save(&mut self.store, &self.config, name, category)
    }

    // --- Bundles and files ---

    pub fn import_files(
        &mut self,
        paths: &[PathBuf],
        mode: Option<&str>,
        category: Option<&str>,
    ) -> Result<commands::CmdResult> {
        commands::import::run(
            &mut self.store,
            &self.registry,
            &self.config,
            paths,
            mode,
            category,
        )
    }

    pub fn export_snippets<S: AsRef<str>>(&self, selectors: &[S]) -> Result<commands::CmdResult> {
        commands::export::export(&self.store, selectors)
    }

    pub fn paste_snippets(&mut self, json: &str) -> Result<commands::CmdResult> {
        commands::export::paste(&mut self.store, &self.config, json)
    }

    // --- Settings and lifecycle ---

    /// Show or change settings. A change re-runs the mode providers so that
    /// toggled built-ins take effect immediately.
    pub fn configure(&mut self, action: ConfigAction) -> Result<commands::CmdResult> {
        let changes = matches!(action, ConfigAction::Set(..));
        let result = commands::config::run(
            &mut self.config,
            self.config_dir.as_deref(),
            action,
        )?;
        if changes {
            self.reregister_modes();
        }
        Ok(result)
    }

    /// Re-read everything from the backend, dropping unsaved changes.
    pub fn reload(&mut self) -> Result<()> {
        self.store.reload()
    }

    /// Empty the store and persist the empty state.
    pub fn reset(&mut self) -> Result<()> {
        self.store.reset()
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::list::{ListFilter, SortKey, SortSpec};
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel, ModeInfo};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnipxError;
    use crate::test_utils::mem_api;
    use serde_json::json;

    #[test]
    fn test_execution_mode_round_trip() {
        let mut api = mem_api();
        assert_eq!(
            api.execute_snippet("A", "hi", "Echo").unwrap().results,
            vec![json!("hi\n")]
        );

        assert!(api.unregister_mode("Echo"));
        assert_eq!(
            api.execute_snippet("A", "hi", "Echo"),
            Err(ExecutionError::UnknownMode("Echo".into()))
        );
    }

    #[test]
    fn test_sentinel_is_reserved() {
        let mut api = mem_api();
        assert!(!api.register_mode(ExecutionMode::from_fn("None", |_| Ok(vec![]))));
        assert!(!api.has_mode("None"));
        assert_eq!(
            api.execute_snippet("A", "x", "None"),
            Err(ExecutionError::SentinelModeSelected)
        );
    }

    #[test]
    fn test_names_stay_unique_through_renames() {
        let mut api = mem_api();
        api.add_snippet("Foo", "", None, None).unwrap();
        api.add_snippet("Bar", "", None, None).unwrap();
        api.add_snippet("foo", "", None, None).unwrap();
        api.rename_snippet("Bar", "FOO").unwrap();
        api.rename_snippet("foo_1", "Bar").unwrap();

        let mut names: Vec<String> = api
            .store()
            .snippets()
            .map(|s| s.name.to_lowercase())
            .collect();
        names.sort();
        let before = names.len();
        names.dedup();
        assert_eq!(names.len(), before);
    }

    #[test]
    fn test_add_snippet_rejects_unknown_mode() {
        let mut api = mem_api();
        let err = api.add_snippet("X", "", Some("Cobol"), None).unwrap_err();
        assert!(matches!(err, SnipxError::Api(_)));
        assert!(api.store().is_empty());
    }

    #[test]
    fn test_category_rename_cascades() {
        let mut api = mem_api();
        api.add_snippet("S", "", None, Some("Old")).unwrap();
        api.rename_category("Old", "New").unwrap();

        let s = api.store().get_snippet_by_name("S", None).unwrap();
        assert_eq!(s.category.as_deref(), Some("New"));
        let categories = api.list_categories().unwrap().categories;
        assert_eq!(categories, vec!["New".to_string()]);
    }

    #[test]
    fn test_list_uses_configured_sort() {
        let mut api = mem_api();
        api.add_snippet("b", "", None, None).unwrap();
        api.add_snippet("a", "", None, None).unwrap();
        api.configure(ConfigAction::Set("default_sort".into(), "name-desc".into()))
            .unwrap();

        let listed = api.list_snippets(&ListFilter::default(), None).unwrap();
        let names: Vec<&str> = listed
            .listed_snippets
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_configure_reregisters_providers() {
        let mut api = SnipxApi::new(crate::test_utils::mem_store(), SnipxConfig::default());
        assert!(api.has_mode("Lua"));
        api.configure(ConfigAction::Set("enable_builtin_lua".into(), "false".into()))
            .unwrap();
        assert!(!api.has_mode("Lua"));
    }
}
