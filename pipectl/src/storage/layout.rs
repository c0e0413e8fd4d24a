//! Configuration directory layout

use std::path::PathBuf;

use crate::filesys::file::File;

/// Environment variable overriding the configuration directory
pub const HOME_ENV: &str = "PIPECTL_HOME";

/// Where the client keeps its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }
}

impl Default for StorageLayout {
    /// `$PIPECTL_HOME`, else `~/.pipectl`, else `./.pipectl`
    fn default() -> Self {
        if let Some(dir) = std::env::var_os(HOME_ENV) {
            return Self::new(dir);
        }

        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(home.join(".pipectl"))
    }
}
