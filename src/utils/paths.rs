use dirs::home_dir;
use std::{env, fs, io, path::Path, path::PathBuf};

const DEFAULT_DIR_NAME: &str = ".budget_tracker";
const DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "config.json";
pub const HOME_ENV: &str = "BUDGET_TRACKER_HOME";

/// Returns the application directory, defaulting to `~/.budget_tracker`.
pub fn app_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Default directory holding the ledger record files.
pub fn data_dir_in(base: &Path) -> PathBuf {
    base.join(DATA_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    base.join(CONFIG_FILE)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling path used to stage a write before renaming it into place.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}
