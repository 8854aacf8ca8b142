//! # Execution Mode Registry
//!
//! A name → executor table. Names are matched case-insensitively, the reserved
//! name `None` can never be registered, and an existing entry is never
//! overwritten. The registry is rebuilt on every start and never persisted.

use crate::model::is_none_mode;
use crate::naming::names_eq;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Why running a snippet did not produce results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Please select a valid execution mode!")]
    SentinelModeSelected,

    #[error("Please select a valid execution mode! (unknown: {0})")]
    UnknownMode(String),

    #[error("Execution mode '{0}' has no executor")]
    InvalidExecutor(String),

    #[error("Compilation failed with {} error(s)", .diagnostics.len())]
    CompilationFailed { diagnostics: Vec<String> },

    #[error("Runtime failure: {0}")]
    RuntimeFailure(String),
}

/// Something that can run code text and hand back zero or more values.
pub trait Executor {
    fn execute(&self, code: &str) -> Result<Vec<Value>, ExecutionError>;
}

impl<F> Executor for F
where
    F: Fn(&str) -> Result<Vec<Value>, ExecutionError>,
{
    fn execute(&self, code: &str) -> Result<Vec<Value>, ExecutionError> {
        self(code)
    }
}

#[derive(Clone)]
pub struct ExecutionMode {
    pub name: String,
    pub description: Option<String>,
    executor: Option<Rc<dyn Executor>>,
}

impl ExecutionMode {
    pub fn new(name: impl Into<String>, executor: impl Executor + 'static) -> Self {
        let executor: Rc<dyn Executor> = Rc::new(executor);
        Self {
            name: name.into(),
            description: None,
            executor: Some(executor),
        }
    }

    /// Like [`ExecutionMode::new`], with the closure signature spelled out so
    /// inline closures infer cleanly.
    pub fn from_fn<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str) -> Result<Vec<Value>, ExecutionError> + 'static,
    {
        Self::new(name, f)
    }

    /// A mode with an empty executor slot. Executing it fails with
    /// [`ExecutionError::InvalidExecutor`].
    pub fn without_executor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            executor: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn executor(&self) -> Option<Rc<dyn Executor>> {
        self.executor.clone()
    }
}

impl fmt::Debug for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionMode")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("has_executor", &self.executor.is_some())
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct ExecutionModeRegistry {
    modes: Vec<ExecutionMode>,
}

impl ExecutionModeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mode. Returns false (and logs) when the name is empty, reserved,
    /// or already taken.
    pub fn register(&mut self, mode: ExecutionMode) -> bool {
        if mode.name.trim().is_empty() {
            log::error!("Cannot register an execution mode with an empty name");
            return false;
        }
        if is_none_mode(&mode.name) {
            log::error!("Execution mode name '{}' is reserved", mode.name);
            return false;
        }
        if self.has(&mode.name) {
            log::error!("Execution mode '{}' is already registered", mode.name);
            return false;
        }
        log::info!("Registered execution mode '{}'", mode.name);
        self.modes.push(mode);
        true
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        let before = self.modes.len();
        self.modes.retain(|m| !names_eq(&m.name, name));
        let removed = self.modes.len() != before;
        if removed {
            log::info!("Unregistered execution mode '{}'", name);
        }
        removed
    }

    pub fn unregister_all(&mut self) {
        self.modes.clear();
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&ExecutionMode> {
        self.modes.iter().find(|m| names_eq(&m.name, name))
    }

    /// Registered modes in registration order.
    pub fn modes(&self) -> &[ExecutionMode] {
        &self.modes
    }

    pub fn names(&self) -> Vec<String> {
        self.modes.iter().map(|m| m.name.clone()).collect()
    }

    /// Run `code` with the named mode's executor.
    pub fn execute(&self, code: &str, mode_name: &str) -> Result<Vec<Value>, ExecutionError> {
        let mode = self
            .get(mode_name)
            .ok_or_else(|| ExecutionError::UnknownMode(mode_name.to_string()))?;
        // Own a handle so the call does not borrow the registry.
        let executor = mode
            .executor()
            .ok_or_else(|| ExecutionError::InvalidExecutor(mode.name.clone()))?;
        executor.execute(code)
    }
}
