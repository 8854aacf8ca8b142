use crate::commands::helpers::unique_snippet_name;
use crate::commands::update::canonical_mode;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::SnipxConfig;
use crate::error::{Result, SnipxError};
use crate::model::NONE_MODE;
use crate::modes::{lua, rust};
use crate::registry::ExecutionModeRegistry;
use crate::store::{SnippetStore, StorageBackend};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions picked up when importing a directory.
pub const IMPORT_EXTENSIONS: &[&str] = &["rs", "lua", "txt"];

/// Import files as snippets, one per file, named after the file. Directories
/// contribute their files with a known extension. `mode` applies to every
/// file; without it the mode is guessed from the extension.
pub fn run<B: StorageBackend>(
    store: &mut SnippetStore<B>,
    registry: &ExecutionModeRegistry,
    config: &SnipxConfig,
    paths: &[PathBuf],
    mode: Option<&str>,
    category: Option<&str>,
) -> Result<CmdResult> {
    let forced_mode = mode.map(|m| canonical_mode(registry, m)).transpose()?;
    let mut result = CmdResult::default();

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)
                .map_err(SnipxError::Io)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && has_import_extension(p))
                .collect();
            entries.sort();
            files.extend(entries);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            result.add_message(CmdMessage::warning(format!(
                "Path not found: {}",
                path.display()
            )));
        }
    }

    for file in &files {
        let code = match fs::read_to_string(file) {
            Ok(code) => code,
            Err(e) => {
                result.add_message(CmdMessage::warning(format!(
                    "Failed to import {}: {}",
                    file.display(),
                    e
                )));
                continue;
            }
        };

        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let stem: String = stem
            .chars()
            .filter(|c| !config.forbidden_name_chars.contains(c))
            .collect();

        let mode = forced_mode
            .clone()
            .unwrap_or_else(|| guess_mode(registry, file));
        let name = unique_snippet_name(store, config, &stem, None);
        let snippet = store.add_snippet(&code, &name, Some(mode.as_str()), category, false)?;
        result.add_message(CmdMessage::info(format!(
            "Imported {} as {}",
            file.display(),
            snippet.name
        )));
        result.affected_snippets.push(snippet);
    }

    if !result.affected_snippets.is_empty() {
        store.commit()?;
    }
    result.add_message(CmdMessage::success(format!(
        "Total imported: {}",
        result.affected_snippets.len()
    )));
    Ok(result)
}

fn has_import_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMPORT_EXTENSIONS.iter().any(|x| x.eq_ignore_ascii_case(e)))
}

/// The mode matching a file's extension, if that mode is registered.
pub fn guess_mode(registry: &ExecutionModeRegistry, path: &Path) -> String {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase();
    let candidate = match ext.as_str() {
        "rs" => rust::MODE_NAME,
        "lua" => lua::MODE_NAME,
        _ => NONE_MODE,
    };
    registry
        .get(candidate)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| NONE_MODE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ExecutionMode;
    use crate::test_utils::{echo_registry, mem_store};
    use tempfile::TempDir;

    #[test]
    fn test_import_file_named_after_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("Greeting.lua");
        fs::write(&file, "return 'hi'").unwrap();

        let mut registry = echo_registry();
        registry.register(ExecutionMode::from_fn("Lua", |_| Ok(vec![])));
        let mut store = mem_store();
        let result = run(
            &mut store,
            &registry,
            &SnipxConfig::default(),
            &[file],
            None,
            None,
        )
        .unwrap();

        let s = &result.affected_snippets[0];
        assert_eq!(s.name, "Greeting");
        assert_eq!(s.code, "return 'hi'");
        assert_eq!(s.execution_mode, "Lua");
        assert_eq!(store.backend().save_count(), 1);
    }

    #[test]
    fn test_import_directory_and_name_collisions() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one").unwrap();
        fs::write(dir.path().join("a.rs"), "two").unwrap();
        fs::write(dir.path().join("skip.md"), "three").unwrap();

        let registry = echo_registry();
        let mut store = mem_store();
        let result = run(
            &mut store,
            &registry,
            &SnipxConfig::default(),
            &[dir.path().to_path_buf()],
            Some("echo"),
            Some("Imported"),
        )
        .unwrap();

        let names: Vec<&str> = result.affected_snippets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "a_1"]);
        assert!(result
            .affected_snippets
            .iter()
            .all(|s| s.execution_mode == "Echo" && s.in_category("Imported")));
    }

    #[test]
    fn test_missing_path_is_a_warning() {
        let registry = echo_registry();
        let mut store = mem_store();
        let result = run(
            &mut store,
            &registry,
            &SnipxConfig::default(),
            &[PathBuf::from("/definitely/not/here.lua")],
            None,
            None,
        )
        .unwrap();
        assert!(result.affected_snippets.is_empty());
        assert_eq!(store.backend().save_count(), 0);
    }

    #[test]
    fn test_unregistered_mode_guess_falls_back_to_none() {
        let registry = echo_registry();
        assert_eq!(guess_mode(&registry, Path::new("x.rs")), "None");
    }
}
