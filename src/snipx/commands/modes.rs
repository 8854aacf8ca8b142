use crate::commands::{CmdResult, ModeInfo};
use crate::error::Result;
use crate::registry::ExecutionModeRegistry;

/// Registered modes, in registration order.
pub fn run(registry: &ExecutionModeRegistry) -> Result<CmdResult> {
    let modes = registry
        .modes()
        .iter()
        .map(|m| ModeInfo {
            name: m.name.clone(),
            description: m.description.clone(),
        })
        .collect();
    Ok(CmdResult {
        modes,
        ..CmdResult::default()
    })
}
