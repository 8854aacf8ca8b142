use crate::commands::{CmdMessage, CmdResult};
use crate::config::SnipxConfig;
use crate::error::{Result, SnipxError};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Inspect or change settings. `Set` writes `config.json` into `config_dir`
/// when there is one; otherwise the change lasts for this session only.
pub fn run(
    config: &mut SnipxConfig,
    config_dir: Option<&Path>,
    action: ConfigAction,
) -> Result<CmdResult> {
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => {
            for (key, value) in config.entries() {
                result.add_message(CmdMessage::info(format!("{} = {}", key, value)));
            }
        }
        ConfigAction::ShowKey(key) => {
            let value = config
                .get(&key)
                .ok_or_else(|| SnipxError::Api(format!("Unknown config key: {}", key)))?;
            result.add_message(CmdMessage::info(format!("{} = {}", key, value)));
        }
        ConfigAction::Set(key, value) => {
            config.set(&key, &value)?;
            if let Some(dir) = config_dir {
                config.save(dir)?;
            }
            result.add_message(CmdMessage::success(format!("{} set to {}", key, value)));
        }
    }

    result.config = Some(config.clone());
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_persists() {
        let dir = tempdir().unwrap();
        let mut config = SnipxConfig::default();
        run(
            &mut config,
            Some(dir.path()),
            ConfigAction::Set("name_max_length".into(), "12".into()),
        )
        .unwrap();

        assert_eq!(config.name_max_length, 12);
        assert_eq!(SnipxConfig::load(dir.path()).unwrap().name_max_length, 12);
    }

    #[test]
    fn test_show_key() {
        let mut config = SnipxConfig::default();
        let result = run(
            &mut config,
            None,
            ConfigAction::ShowKey("rustc_path".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "rustc_path = rustc");
    }

    #[test]
    fn test_bad_value_is_not_saved() {
        let dir = tempdir().unwrap();
        let mut config = SnipxConfig::default();
        let err = run(
            &mut config,
            Some(dir.path()),
            ConfigAction::Set("enable_builtin_lua".into(), "maybe".into()),
        );
        assert!(err.is_err());
        assert!(!dir.path().join("config.json").exists());
    }
}
