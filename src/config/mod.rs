use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    errors::StorageError,
    ledger::ListOrder,
    utils::paths::{self, ensure_dir, tmp_path},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Where the record files live; defaults to `<app dir>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub list_order: ListOrder,
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, StorageError> {
        Self::with_base_dir(paths::app_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, StorageError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: paths::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config, StorageError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Resolves the record directory for `config`, relative paths being
    /// anchored at the application directory.
    pub fn data_dir(&self, config: &Config) -> PathBuf {
        match &config.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => self.base.join(dir),
            None => paths::data_dir_in(&self.base),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn write_atomic(path: &Path, data: &str) -> Result<(), StorageError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}
