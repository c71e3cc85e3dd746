//! shot_plan.json management
//!
//! Persists the project record and enforces the panel lifecycle:
//! - Six panels with stable ids
//! - Atomic read-mutate-write per command
//! - Panel image files under `panels/`

mod assets;
mod layout;
mod manager;

pub use assets::PanelAssets;
pub use layout::{ProjectLayout, RECORD_FILENAME};
pub use manager::{ProjectInputs, ProjectStore};

use std::io::Write;
use std::path::Path;

/// Write through a temp file in the target's directory, then rename over it
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::NamedTempFile::new_in(dir)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
