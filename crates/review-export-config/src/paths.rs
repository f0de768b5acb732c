use std::path::{Path, PathBuf};

const APP_DIR: &str = "review-export";

pub struct PathManager {
    config_dir: PathBuf,
}

impl PathManager {
    /// Paths rooted at an explicit base directory
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: base.into().join(APP_DIR),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}

impl Default for PathManager {
    fn default() -> Self {
        // Platform-specific (e.g., ~/.config/review-export on Linux), else relative to the working dir
        Self::with_base(dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")))
    }
}
