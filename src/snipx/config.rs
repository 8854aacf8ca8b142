//! # Configuration
//!
//! snipx settings live in `config.json` inside the data directory. Every field
//! has a serde default, so a missing file or a partial file both load.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `forbidden_name_chars` | `["*"]` | Characters rejected in snippet names |
//! | `name_max_length` | `30` | Longest generated name, in characters |
//! | `enable_builtin_rust` | `true` | Register the `Rust` compile mode |
//! | `enable_builtin_lua` | `true` | Register the `Lua` mode |
//! | `enable_builtin_lua_custom` | `false` | Register `Lua (Custom)` |
//! | `lua_custom_prelude` | none | Lua source run before every `Lua (Custom)` snippet |
//! | `lua_custom_replaces_lua` | `false` | `Lua (Custom)` unregisters the plain `Lua` mode |
//! | `rustc_path` | `rustc` | Compiler used by the `Rust` mode |
//! | `rustc_args` | `[]` | Extra compiler arguments |
//! | `rust_edition` | `2021` | Edition passed to the compiler |
//! | `run_timeout_secs` | none | Kill compiled snippets after this many seconds |
//! | `default_sort` | `name` | Listing order when `--sort` is not given |

use crate::error::{Result, SnipxError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnipxConfig {
    #[serde(default = "default_forbidden")]
    pub forbidden_name_chars: Vec<char>,

    #[serde(default = "default_name_max_length")]
    pub name_max_length: usize,

    #[serde(default = "default_true")]
    pub enable_builtin_rust: bool,

    #[serde(default = "default_true")]
    pub enable_builtin_lua: bool,

    #[serde(default)]
    pub enable_builtin_lua_custom: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lua_custom_prelude: Option<String>,

    #[serde(default)]
    pub lua_custom_replaces_lua: bool,

    #[serde(default = "default_rustc")]
    pub rustc_path: String,

    #[serde(default)]
    pub rustc_args: Vec<String>,

    #[serde(default = "default_edition")]
    pub rust_edition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_timeout_secs: Option<u64>,

    #[serde(default = "default_sort")]
    pub default_sort: String,
}

fn default_forbidden() -> Vec<char> {
    vec!['*']
}

fn default_name_max_length() -> usize {
    crate::naming::NAME_MAX_LENGTH
}

fn default_true() -> bool {
    true
}

fn default_rustc() -> String {
    "rustc".to_string()
}

fn default_edition() -> String {
    "2021".to_string()
}

fn default_sort() -> String {
    "name".to_string()
}

impl Default for SnipxConfig {
    fn default() -> Self {
        Self {
            forbidden_name_chars: default_forbidden(),
            name_max_length: default_name_max_length(),
            enable_builtin_rust: true,
            enable_builtin_lua: true,
            enable_builtin_lua_custom: false,
            lua_custom_prelude: None,
            lua_custom_replaces_lua: false,
            rustc_path: default_rustc(),
            rustc_args: Vec::new(),
            rust_edition: default_edition(),
            run_timeout_secs: None,
            default_sort: default_sort(),
        }
    }
}

impl SnipxConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(SnipxError::Io)?;
        let mut config: SnipxConfig =
            serde_json::from_str(&content).map_err(SnipxError::Serialization)?;
        if config.name_max_length == 0 {
            log::warn!(
                "name_max_length of 0 in {}, using {}",
                config_path.display(),
                default_name_max_length()
            );
            config.name_max_length = default_name_max_length();
        }
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(SnipxError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(SnipxError::Serialization)?;
        fs::write(config_path, content).map_err(SnipxError::Io)?;
        Ok(())
    }

    /// Every settable key with its current value, rendered for display.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let chars: String = self.forbidden_name_chars.iter().collect();
        vec![
            ("forbidden_name_chars", chars),
            ("name_max_length", self.name_max_length.to_string()),
            ("enable_builtin_rust", self.enable_builtin_rust.to_string()),
            ("enable_builtin_lua", self.enable_builtin_lua.to_string()),
            (
                "enable_builtin_lua_custom",
                self.enable_builtin_lua_custom.to_string(),
            ),
            (
                "lua_custom_prelude",
                self.lua_custom_prelude.clone().unwrap_or_default(),
            ),
            (
                "lua_custom_replaces_lua",
                self.lua_custom_replaces_lua.to_string(),
            ),
            ("rustc_path", self.rustc_path.clone()),
            ("rustc_args", self.rustc_args.join(" ")),
            ("rust_edition", self.rust_edition.clone()),
            (
                "run_timeout_secs",
                self.run_timeout_secs
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
            ),
            ("default_sort", self.default_sort.clone()),
        ]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Set a key from its textual form. Empty values reset optional keys.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "forbidden_name_chars" => self.forbidden_name_chars = value.chars().collect(),
            "name_max_length" => {
                let n = parse_value::<usize>(key, value)?;
                if n == 0 {
                    return Err(SnipxError::Api(
                        "name_max_length must be at least 1".to_string(),
                    ));
                }
                self.name_max_length = n;
            }
            "enable_builtin_rust" => self.enable_builtin_rust = parse_value(key, value)?,
            "enable_builtin_lua" => self.enable_builtin_lua = parse_value(key, value)?,
            "enable_builtin_lua_custom" => {
                self.enable_builtin_lua_custom = parse_value(key, value)?
            }
            "lua_custom_prelude" => {
                self.lua_custom_prelude = (!value.is_empty()).then(|| value.to_string())
            }
            "lua_custom_replaces_lua" => self.lua_custom_replaces_lua = parse_value(key, value)?,
            "rustc_path" => self.rustc_path = value.to_string(),
            "rustc_args" => {
                self.rustc_args = value.split_whitespace().map(str::to_string).collect()
            }
            "rust_edition" => self.rust_edition = value.to_string(),
            "run_timeout_secs" => {
                self.run_timeout_secs = if value.is_empty() {
                    None
                } else {
                    Some(parse_value(key, value)?)
                }
            }
            "default_sort" => {
                crate::commands::list::SortSpec::parse(value)?;
                self.default_sort = value.to_string();
            }
            other => {
                return Err(SnipxError::Api(format!("Unknown config key: {}", other)));
            }
        }
        Ok(())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| SnipxError::Api(format!("Invalid value for {}: {}", key, value)))
}
