//! # Execution Mode Providers
//!
//! Modes reach the registry through providers: each [`ModeProvider`] has a
//! priority and a registration function. [`bootstrap`] runs them once, lowest
//! priority first, so a later provider can inspect (or replace) what earlier
//! ones registered.
//!
//! Built-in providers:
//!
//! | Provider | Priority | Mode | Enabled by |
//! |----------|----------|------|------------|
//! | rust | 0 | `Rust` | `enable_builtin_rust` |
//! | lua | 0 | `Lua` | `enable_builtin_lua` |
//! | lua-custom | 5 | `Lua (Custom)` | `enable_builtin_lua_custom` |

use crate::config::SnipxConfig;
use crate::registry::{ExecutionMode, ExecutionModeRegistry};

pub mod lua;
pub mod rust;

pub type RegisterFn = fn(&mut ExecutionModeRegistry, &SnipxConfig);

#[derive(Clone, Copy)]
pub struct ModeProvider {
    pub name: &'static str,
    pub priority: i32,
    pub register: RegisterFn,
}

impl std::fmt::Debug for ModeProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeProvider")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .finish()
    }
}

pub fn builtin_providers() -> Vec<ModeProvider> {
    vec![
        ModeProvider {
            name: "rust",
            priority: 0,
            register: register_rust,
        },
        ModeProvider {
            name: "lua",
            priority: 0,
            register: register_lua,
        },
        ModeProvider {
            name: "lua-custom",
            priority: 5,
            register: register_lua_custom,
        },
    ]
}

/// Run every provider once, in ascending priority. Ties keep list order.
pub fn bootstrap(
    registry: &mut ExecutionModeRegistry,
    providers: &[ModeProvider],
    config: &SnipxConfig,
) {
    let mut ordered: Vec<&ModeProvider> = providers.iter().collect();
    ordered.sort_by_key(|p| p.priority);
    for provider in ordered {
        log::debug!(
            "Running mode provider '{}' (priority {})",
            provider.name,
            provider.priority
        );
        (provider.register)(registry, config);
    }
}

/// Clear the registry and bootstrap it again, e.g. after a settings change.
pub fn reregister(
    registry: &mut ExecutionModeRegistry,
    providers: &[ModeProvider],
    config: &SnipxConfig,
) {
    registry.unregister_all();
    bootstrap(registry, providers, config);
}

fn register_rust(registry: &mut ExecutionModeRegistry, config: &SnipxConfig) {
    if !config.enable_builtin_rust {
        return;
    }
    registry.register(
        ExecutionMode::new(rust::MODE_NAME, rust::RustCompiler::from_config(config))
            .with_description("Compile the snippet as a Rust method body and run it"),
    );
}

fn register_lua(registry: &mut ExecutionModeRegistry, config: &SnipxConfig) {
    if !config.enable_builtin_lua {
        return;
    }
    match lua::LuaRunner::new() {
        Ok(runner) => {
            registry.register(
                ExecutionMode::new(lua::MODE_NAME, runner)
                    .with_description("Run the snippet in an embedded Lua 5.4 interpreter"),
            );
        }
        Err(e) => log::error!("Could not start Lua interpreter: {}", e),
    }
}

fn register_lua_custom(registry: &mut ExecutionModeRegistry, config: &SnipxConfig) {
    if !config.enable_builtin_lua_custom {
        return;
    }
    if config.lua_custom_replaces_lua && registry.unregister(lua::MODE_NAME) {
        log::info!("'{}' replaces '{}'", lua::CUSTOM_MODE_NAME, lua::MODE_NAME);
    }
    match lua::LuaRunner::new() {
        Ok(runner) => {
            let runner = runner.with_prelude(config.lua_custom_prelude.clone());
            registry.register(
                ExecutionMode::new(lua::CUSTOM_MODE_NAME, runner)
                    .with_description("Lua with the configured host prelude"),
            );
        }
        Err(e) => log::error!("Could not start Lua interpreter: {}", e),
    }
}
