use super::backend::StorageBackend;
use crate::error::{Result, SnipxError};
use crate::model::StoreData;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const DATA_FILENAME: &str = "data.json";

pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_file(&self) -> PathBuf {
        self.root.join(DATA_FILENAME)
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).map_err(SnipxError::Io)?;
        }
        Ok(())
    }
}

impl StorageBackend for FsBackend {
    fn load(&self) -> Result<Option<StoreData>> {
        let data_file = self.data_file();
        if !data_file.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(data_file).map_err(SnipxError::Io)?;
        let data: StoreData = serde_json::from_str(&content).map_err(SnipxError::Serialization)?;
        Ok(Some(data))
    }

    fn save(&self, data: &StoreData) -> Result<()> {
        self.ensure_dir(&self.root)?;

        let content = serde_json::to_string_pretty(data).map_err(SnipxError::Serialization)?;

        // Atomic write
        let tmp_file = self.root.join(format!(".data-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp_file, content).map_err(SnipxError::Io)?;
        fs::rename(&tmp_file, self.data_file()).map_err(SnipxError::Io)?;

        Ok(())
    }
}
