//! The `Lua` execution modes, backed by an embedded Lua 5.4 via `mlua`.
//!
//! Every run gets a fresh environment table whose metatable falls back to the
//! interpreter's globals. Snippets can read globals and the `snipx` host
//! table, but their own assignments land in the throwaway environment and are
//! gone once the run ends.
//!
//! The chunk's return values are the results, converted to JSON.

use crate::registry::{ExecutionError, Executor};
use mlua::{Lua, MultiValue, Table, Value as LuaValue};
use serde_json::{Map, Number, Value};
use std::collections::HashSet;
use std::ffi::c_void;

pub const MODE_NAME: &str = "Lua";
pub const CUSTOM_MODE_NAME: &str = "Lua (Custom)";

const CHUNK_NAME: &str = "snippet";
const MAX_DEPTH: usize = 16;

pub struct LuaRunner {
    lua: Lua,
    prelude: Option<String>,
}

impl LuaRunner {
    pub fn new() -> Result<Self, ExecutionError> {
        let lua = Lua::new();
        install_host_api(&lua).map_err(runtime)?;
        Ok(Self { lua, prelude: None })
    }

    /// Source run in the snippet's environment before the snippet itself.
    pub fn with_prelude(mut self, prelude: Option<String>) -> Self {
        self.prelude = prelude.filter(|p| !p.trim().is_empty());
        self
    }

    fn environment(&self) -> mlua::Result<Table> {
        self.lua
            .load("return setmetatable({}, { __index = _G })")
            .set_name("environment")
            .eval::<Table>()
    }
}

impl Executor for LuaRunner {
    fn execute(&self, code: &str) -> Result<Vec<Value>, ExecutionError> {
        let env = self.environment().map_err(runtime)?;

        if let Some(prelude) = &self.prelude {
            self.lua
                .load(prelude.as_str())
                .set_name("prelude")
                .set_environment(env.clone())
                .exec()
                .map_err(|e| match classify(e) {
                    ExecutionError::RuntimeFailure(msg) => {
                        ExecutionError::RuntimeFailure(format!("prelude: {}", msg))
                    }
                    other => other,
                })?;
        }

        let values = self
            .lua
            .load(code)
            .set_name(CHUNK_NAME)
            .set_environment(env)
            .call::<MultiValue>(())
            .map_err(classify)?;

        let mut seen = HashSet::new();
        Ok(values
            .into_iter()
            .map(|v| lua_to_json(&v, 0, &mut seen))
            .collect())
    }
}

fn install_host_api(lua: &Lua) -> mlua::Result<()> {
    let host = lua.create_table()?;
    host.set(
        "log",
        lua.create_function(|_, message: String| {
            log::info!("[lua] {}", message);
            Ok(())
        })?,
    )?;
    host.set("version", env!("CARGO_PKG_VERSION"))?;
    lua.globals().set("snipx", host)?;
    Ok(())
}

fn classify(error: mlua::Error) -> ExecutionError {
    match error {
        mlua::Error::SyntaxError { message, .. } => ExecutionError::CompilationFailed {
            diagnostics: vec![message],
        },
        other => runtime(other),
    }
}

fn runtime(error: mlua::Error) -> ExecutionError {
    ExecutionError::RuntimeFailure(error.to_string())
}

/// Tables already converted once render as "table", which keeps
/// self-referencing tables finite.
fn lua_to_json(value: &LuaValue, depth: usize, seen: &mut HashSet<*const c_void>) -> Value {
    match value {
        LuaValue::Nil => Value::Null,
        LuaValue::Boolean(b) => Value::Bool(*b),
        LuaValue::Integer(i) => Value::from(*i),
        LuaValue::Number(n) => Number::from_f64(*n).map_or(Value::Null, Value::Number),
        LuaValue::String(s) => Value::String(s.to_string_lossy().to_string()),
        LuaValue::Table(t) if depth < MAX_DEPTH && seen.insert(t.to_pointer()) => {
            table_to_json(t, depth + 1, seen)
        }
        LuaValue::Table(_) => Value::String("table".to_string()),
        other => Value::String(other.type_name().to_string()),
    }
}

/// Sequences (keys exactly 1..=n) become arrays, everything else an object
/// with stringified keys.
fn table_to_json(table: &Table, depth: usize, seen: &mut HashSet<*const c_void>) -> Value {
    let mut entries: Vec<(LuaValue, LuaValue)> = table
        .clone()
        .pairs::<LuaValue, LuaValue>()
        .filter_map(|pair| pair.ok())
        .collect();

    let is_sequence = entries.iter().all(|(k, _)| {
        matches!(k, LuaValue::Integer(i) if *i >= 1 && (*i as usize) <= entries.len())
    });

    if is_sequence && !entries.is_empty() {
        entries.sort_by_key(|(k, _)| match k {
            LuaValue::Integer(i) => *i,
            _ => 0,
        });
        return Value::Array(
            entries
                .iter()
                .map(|(_, v)| lua_to_json(v, depth, seen))
                .collect(),
        );
    }

    let mut map = Map::new();
    for (key, value) in &entries {
        let key = match key {
            LuaValue::String(s) => s.to_string_lossy().to_string(),
            LuaValue::Integer(i) => i.to_string(),
            LuaValue::Number(n) => n.to_string(),
            LuaValue::Boolean(b) => b.to_string(),
            other => other.type_name().to_string(),
        };
        map.insert(key, lua_to_json(value, depth, seen));
    }
    Value::Object(map)
}
