use std::path::PathBuf;

use crate::error::ScanError;

pub mod db;
pub mod default;

/// Name of the per-user directory under $HOME
pub const USER_DIR_NAME: &str = ".liveprobe";

/// Get the per-user directory, creating it on first use.
pub fn get_user_dir() -> Result<PathBuf, ScanError> {
    let home = home::home_dir().ok_or(ScanError::UserDir)?;
    let dir = home.join(USER_DIR_NAME);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    Ok(dir)
}

/// Get the path of a file in the per-user directory.
pub fn get_user_file_path(file_name: &str) -> Result<PathBuf, ScanError> {
    Ok(get_user_dir()?.join(file_name))
}
