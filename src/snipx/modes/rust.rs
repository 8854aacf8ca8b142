//! The `Rust` execution mode.
//!
//! Snippet text is treated as the body of a method. It is wrapped in a
//! throwaway module, compiled with `rustc` into a temporary directory, and the
//! resulting program is run. The method's tail expression is the result: the
//! program writes its `Debug` rendering to a file named on its command line,
//! and that becomes the single result value (`()` maps to null).
//!
//! Compiler errors come back as [`ExecutionError::CompilationFailed`] with
//! every diagnostic the compiler reported; in that case nothing is run.

use crate::config::SnipxConfig;
use crate::registry::{ExecutionError, Executor};
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

pub const MODE_NAME: &str = "Rust";

const RESULT_FILE: &str = "result.txt";
const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone)]
pub struct RustCompiler {
    rustc: String,
    extra_args: Vec<String>,
    edition: String,
    timeout: Option<Duration>,
}

impl Default for RustCompiler {
    fn default() -> Self {
        Self::from_config(&SnipxConfig::default())
    }
}

impl RustCompiler {
    pub fn from_config(config: &SnipxConfig) -> Self {
        Self {
            rustc: config.rustc_path.clone(),
            extra_args: config.rustc_args.clone(),
            edition: config.rust_edition.clone(),
            timeout: config.run_timeout_secs.map(Duration::from_secs),
        }
    }

    /// The complete program compiled for `code`.
    pub fn wrap(code: &str) -> String {
        format!(
            r#"mod snippet {{
    pub struct Snippet;

    impl Snippet {{
        #[allow(unused_mut, unused_variables, unreachable_code, clippy::all)]
        pub fn run(&self) -> impl ::std::fmt::Debug {{
{code}
        }}
    }}
}}

fn main() {{
    let result = snippet::Snippet.run();
    let rendered = format!("{{:?}}", result);
    if let Some(path) = ::std::env::args_os().nth(1) {{
        let _ = ::std::fs::write(path, rendered);
    }}
}}
"#
        )
    }

    fn compile(&self, source: &Path, binary: &Path) -> Result<(), ExecutionError> {
        let output = Command::new(&self.rustc)
            .arg("--edition")
            .arg(&self.edition)
            .args(["--error-format=json", "-A", "warnings", "-o"])
            .arg(binary)
            .args(&self.extra_args)
            .arg(source)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| ExecutionError::CompilationFailed {
                diagnostics: vec![format!("could not run '{}': {}", self.rustc, e)],
            })?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut diagnostics = parse_diagnostics(&stderr);
        if diagnostics.is_empty() {
            let raw = stderr.trim();
            diagnostics.push(if raw.is_empty() {
                format!("compiler exited with {}", output.status)
            } else {
                raw.to_string()
            });
        }
        Err(ExecutionError::CompilationFailed { diagnostics })
    }

    fn run(&self, binary: &Path, result_file: &Path) -> Result<Vec<Value>, ExecutionError> {
        let mut child = Command::new(binary)
            .arg(result_file)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ExecutionError::RuntimeFailure(format!("could not start snippet: {}", e)))?;

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if let Some(limit) = self.timeout {
                        if started.elapsed() >= limit {
                            log::debug!("Killing snippet process {} after {:?}", child.id(), limit);
                            if let Err(e) = child.kill() {
                                log::warn!("Failed to kill snippet process {}: {}", child.id(), e);
                            }
                            child.wait().ok();
                            return Err(ExecutionError::RuntimeFailure(format!(
                                "snippet timed out after {}s",
                                limit.as_secs()
                            )));
                        }
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(ExecutionError::RuntimeFailure(format!(
                        "could not wait for snippet: {}",
                        e
                    )));
                }
            }
        };

        if !status.success() {
            return Err(ExecutionError::RuntimeFailure(format!(
                "snippet exited with {}",
                status
            )));
        }

        let rendered = fs::read_to_string(result_file).map_err(|e| {
            ExecutionError::RuntimeFailure(format!("snippet produced no result: {}", e))
        })?;
        Ok(vec![debug_to_value(&rendered)])
    }
}

impl Executor for RustCompiler {
    fn execute(&self, code: &str) -> Result<Vec<Value>, ExecutionError> {
        let dir = tempfile::Builder::new()
            .prefix("snipx-rust-")
            .tempdir()
            .map_err(|e| ExecutionError::RuntimeFailure(format!("no temp dir: {}", e)))?;

        let source = dir.path().join("snippet.rs");
        let binary = dir
            .path()
            .join(format!("snippet{}", std::env::consts::EXE_SUFFIX));
        let result_file = dir.path().join(RESULT_FILE);

        let program = Self::wrap(code);
        log::debug!("Compiling wrapped snippet:\n{}", program);
        fs::write(&source, program)
            .map_err(|e| ExecutionError::RuntimeFailure(format!("could not write source: {}", e)))?;

        self.compile(&source, &binary)?;
        self.run(&binary, &result_file)
    }
}

/// Error-level messages from `rustc --error-format=json` output, rendered as
/// the compiler would print them. The trailing "aborting" summary is dropped.
pub fn parse_diagnostics(stderr: &str) -> Vec<String> {
    stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .filter(|msg| msg["level"] == "error")
        .filter(|msg| {
            !msg["message"]
                .as_str()
                .is_some_and(|m| m.starts_with("aborting due to"))
        })
        .filter_map(|msg| {
            msg["rendered"]
                .as_str()
                .or_else(|| msg["message"].as_str())
                .map(|s| s.trim_end().to_string())
        })
        .collect()
}

fn debug_to_value(rendered: &str) -> Value {
    if rendered == "()" {
        Value::Null
    } else {
        Value::String(rendered.to_string())
    }
}
