use super::write_atomic;
use crate::error::{SpotforgeError, SpotforgeResult};
use crate::models::config::CONFIG_FILENAME;
use std::path::{Path, PathBuf};

/// File name of the persisted project record
pub const RECORD_FILENAME: &str = "shot_plan.json";

/// On-disk layout of a project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub inputs: PathBuf,
    pub panels: PathBuf,
    pub exports: PathBuf,
    pub cache: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at `root`, resolved against the working directory when
    /// relative so paths stored in the record stay valid from anywhere
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            inputs: root.join("inputs"),
            panels: root.join("panels"),
            exports: root.join("exports"),
            cache: root.join("cache"),
            root,
        }
    }

    /// Create every working directory that is missing
    pub fn ensure_dirs(&self) -> SpotforgeResult<()> {
        for dir in self.dirs() {
            std::fs::create_dir_all(dir).map_err(|e| {
                SpotforgeError::Configuration(format!(
                    "failed to create {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    pub fn dirs(&self) -> [&Path; 4] {
        [&self.inputs, &self.panels, &self.exports, &self.cache]
    }

    pub fn record_path(&self) -> PathBuf {
        self.root.join(RECORD_FILENAME)
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILENAME)
    }

    pub fn panel_path(&self, id: u32) -> PathBuf {
        self.panels.join(format!("panel_{}.png", id))
    }

    pub fn video_path(&self) -> PathBuf {
        self.exports.join("storyboard.mp4")
    }

    pub fn shot_list_path(&self) -> PathBuf {
        self.exports.join("shot_list.txt")
    }

    pub fn narration_path(&self) -> PathBuf {
        self.exports.join("narration.mp3")
    }

    /// Write an export artifact atomically
    pub fn write_export(&self, path: &Path, contents: &[u8]) -> SpotforgeResult<()> {
        std::fs::create_dir_all(&self.exports).map_err(|e| {
            SpotforgeError::invalid_input("exports", format!("{}: {}", self.exports.display(), e))
        })?;
        write_atomic(path, contents).map_err(|e| {
            SpotforgeError::invalid_input("exports", format!("failed to write {}: {}", path.display(), e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let layout = ProjectLayout::new("/work");
        assert_eq!(layout.record_path(), PathBuf::from("/work/shot_plan.json"));
        assert_eq!(layout.panel_path(4), PathBuf::from("/work/panels/panel_4.png"));
        assert_eq!(layout.video_path(), PathBuf::from("/work/exports/storyboard.mp4"));
        assert_eq!(layout.config_path(), PathBuf::from("/work/spotforge.toml"));
    }

    #[test]
    fn test_relative_root_is_resolved_against_working_dir() {
        let layout = ProjectLayout::new("shoot");
        let cwd = std::env::current_dir().unwrap();

        assert!(layout.root.is_absolute());
        assert_eq!(layout.root, cwd.join("shoot"));
        assert_eq!(layout.panel_path(1), cwd.join("shoot/panels/panel_1.png"));
    }

    #[test]
    fn test_ensure_dirs_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());

        layout.ensure_dirs().unwrap();
        layout.ensure_dirs().unwrap();

        for dir in layout.dirs() {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
    }

    #[test]
    fn test_write_export_creates_exports_dir() {
        let temp = TempDir::new().unwrap();
        let layout = ProjectLayout::new(temp.path());

        layout.write_export(&layout.shot_list_path(), b"list").unwrap();
        assert_eq!(std::fs::read(layout.shot_list_path()).unwrap(), b"list");
    }
}
