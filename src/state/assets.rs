use super::{write_atomic, ProjectLayout};
use crate::error::{SpotforgeError, SpotforgeResult};
use crate::orchestrator::{Collaborator, CollaboratorError};
use image::ImageFormat;
use std::io::Cursor;
use std::path::PathBuf;
use tracing::debug;

/// Writes generated panel images into `panels/`
#[derive(Debug, Clone)]
pub struct PanelAssets {
    layout: ProjectLayout,
}

impl PanelAssets {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    /// Decode collaborator bytes and store them as `panels/panel_<id>.png`.
    ///
    /// The previous asset is only replaced once the new image is fully
    /// written.
    pub fn write_panel(&self, id: u32, bytes: &[u8]) -> SpotforgeResult<PathBuf> {
        let decoded = image::load_from_memory(bytes).map_err(|e| {
            SpotforgeError::collaborator(
                Collaborator::ImageGeneration,
                Some(id),
                CollaboratorError::InvalidResponse(format!("returned data is not an image: {}", e)),
            )
        })?;

        let mut png = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| {
                SpotforgeError::collaborator(
                    Collaborator::ImageGeneration,
                    Some(id),
                    CollaboratorError::InvalidResponse(format!("failed to encode PNG: {}", e)),
                )
            })?;

        std::fs::create_dir_all(&self.layout.panels).map_err(|e| {
            SpotforgeError::invalid_input("panels", format!("{}: {}", self.layout.panels.display(), e))
        })?;

        let path = self.layout.panel_path(id);
        write_atomic(&path, &png).map_err(|e| {
            SpotforgeError::invalid_input("panels", format!("failed to write {}: {}", path.display(), e))
        })?;

        debug!(
            panel = id,
            width = decoded.width(),
            height = decoded.height(),
            path = %path.display(),
            "panel image saved"
        );
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn jpeg_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 4, Rgb([200, 120, 40]));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageFormat::Jpeg)
            .unwrap();
        out
    }

    #[test]
    fn test_write_panel_converts_to_png() {
        let temp = TempDir::new().unwrap();
        let assets = PanelAssets::new(ProjectLayout::new(temp.path()));

        let path = assets.write_panel(2, &jpeg_bytes()).unwrap();

        assert!(path.ends_with("panels/panel_2.png"));
        let written = std::fs::read(&path).unwrap();
        assert_eq!(image::guess_format(&written).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_non_image_payload_keeps_previous_asset() {
        let temp = TempDir::new().unwrap();
        let assets = PanelAssets::new(ProjectLayout::new(temp.path()));
        let path = assets.write_panel(1, &jpeg_bytes()).unwrap();
        let before = std::fs::read(&path).unwrap();

        let err = assets.write_panel(1, b"<html>quota exceeded</html>").unwrap_err();

        assert!(matches!(
            err,
            SpotforgeError::CollaboratorFailure {
                panel: Some(1),
                source: CollaboratorError::InvalidResponse(_),
                ..
            }
        ));
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}
