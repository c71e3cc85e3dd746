//! Integration tests for the storyboard lifecycle
//!
//! Drives generate → edit → export through the public API with in-process
//! collaborators:
//! - Record creation and validation
//! - Per-panel edit success and failure
//! - Export gating and video ordering

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use spotforge::models::VideoConfig;
use spotforge::orchestrator::{
    CollaboratorError, ImageGenerator, ImageRequest, Narrator, VideoAssembler, VideoSpec,
};
use spotforge::services::{self, ExportOptions, GenerateStoryboardInput};
use spotforge::{PanelAssets, PanelStatus, ProjectStore, SpotforgeError, StylePreset};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

fn encoded(format: ImageFormat, color: [u8; 3]) -> Vec<u8> {
    let mut out = Vec::new();
    RgbImage::from_pixel(16, 9, Rgb(color))
        .write_to(&mut Cursor::new(&mut out), format)
        .unwrap();
    out
}

fn write_photo(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let format = if name.ends_with(".png") {
        ImageFormat::Png
    } else {
        ImageFormat::Jpeg
    };
    std::fs::write(&path, encoded(format, [120, 80, 40])).unwrap();
    path
}

/// Succeeds unless the panel id is listed in `fail`
struct FakeGenerator {
    fail: Mutex<Vec<u32>>,
    calls: Mutex<Vec<ImageRequest>>,
}

impl FakeGenerator {
    fn new() -> Self {
        Self {
            fail: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(ids: &[u32]) -> Self {
        let generator = Self::new();
        *generator.fail.lock().unwrap() = ids.to_vec();
        generator
    }
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>, CollaboratorError> {
        self.calls.lock().unwrap().push(request.clone());
        if self.fail.lock().unwrap().contains(&request.panel_id) {
            return Err(CollaboratorError::Unavailable("HTTP 503: overloaded".to_string()));
        }
        let shade = (request.panel_id * 30) as u8;
        Ok(encoded(ImageFormat::Png, [shade, shade, shade]))
    }
}

struct FakeNarrator {
    scripts: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl Narrator for FakeNarrator {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, CollaboratorError> {
        self.scripts
            .lock()
            .unwrap()
            .push((text.to_string(), voice_id.to_string()));
        Ok(b"ID3fake-mp3".to_vec())
    }
}

/// Records the spec and touches the output file
struct FakeAssembler {
    specs: Mutex<Vec<VideoSpec>>,
}

impl FakeAssembler {
    fn new() -> Self {
        Self {
            specs: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl VideoAssembler for FakeAssembler {
    async fn assemble(&self, spec: &VideoSpec) -> Result<PathBuf, CollaboratorError> {
        self.specs.lock().unwrap().push(spec.clone());
        std::fs::write(&spec.output, b"mp4").map_err(|e| CollaboratorError::Unavailable(e.to_string()))?;
        Ok(spec.output.clone())
    }
}

struct Project {
    _temp: TempDir,
    store: ProjectStore,
    assets: PanelAssets,
    photo: PathBuf,
}

fn project() -> Project {
    let temp = TempDir::new().unwrap();
    let photo = write_photo(temp.path(), "coffee.jpg");
    let store = ProjectStore::open(temp.path());
    let assets = PanelAssets::new(store.layout().clone());
    Project {
        _temp: temp,
        store,
        assets,
        photo,
    }
}

fn coffee_input(photo: &Path) -> GenerateStoryboardInput {
    GenerateStoryboardInput {
        brief: "A cozy coffee scene".to_string(),
        product_image: photo.to_path_buf(),
        style: "Warm Lifestyle".to_string(),
        brand_color: Some("#8B4513".to_string()),
    }
}

#[test]
fn test_create_coffee_project() {
    let p = project();
    let record = p
        .store
        .create("A cozy coffee scene", "Warm Lifestyle", Some("#8B4513"), &p.photo)
        .unwrap();

    assert_eq!(record.panels.len(), 6);
    assert_eq!(
        record.panels.iter().map(|panel| panel.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5, 6]
    );
    assert!(record.panels.iter().all(|panel| panel.status == PanelStatus::Pending));
    assert_eq!(record.style, StylePreset::WarmLifestyle);
    assert_eq!(record.style.to_string(), "Warm Lifestyle");
    assert_eq!(record.brand_color.as_deref(), Some("#8B4513"));
    assert!(!p.store.all_panels_ready().unwrap());
}

#[test]
fn test_record_round_trip_is_field_for_field_equal() {
    let p = project();
    p.store
        .create("A cozy coffee scene", "Warm Lifestyle", Some("#8B4513"), &p.photo)
        .unwrap();
    let mut record = p.store.populate_panel(2, "mug on a windowsill", "panels/panel_2.png").unwrap();
    record.panels[4].edit_history.push("warmer light".to_string());

    p.store.save(&mut record).unwrap();
    assert_eq!(p.store.load().unwrap(), record);
}

#[tokio::test]
async fn test_full_generate_then_export() {
    let p = project();
    let generator = FakeGenerator::new();

    let report = services::generate_storyboard(&p.store, &p.assets, &generator, &coffee_input(&p.photo), |_| {})
        .await
        .unwrap();
    assert!(report.is_complete());
    assert!(p.store.all_panels_ready().unwrap());

    let narrator = FakeNarrator {
        scripts: Mutex::new(Vec::new()),
    };
    let assembler = FakeAssembler::new();
    let options = ExportOptions {
        narration: true,
        voice_id: "voice-42".to_string(),
    };
    let summary = services::export_storyboard(
        &p.store,
        Some(&narrator as &dyn Narrator),
        &assembler,
        &VideoConfig::default(),
        &options,
    )
    .await
    .unwrap();

    let layout = p.store.layout();
    assert_eq!(summary.video, layout.video_path());
    assert_eq!(summary.narration, Some(layout.narration_path()));
    assert!(layout.shot_list_path().is_file());
    assert_eq!(std::fs::read(layout.narration_path()).unwrap(), b"ID3fake-mp3");

    let shot_list = std::fs::read_to_string(layout.shot_list_path()).unwrap();
    assert!(shot_list.contains("Brief: A cozy coffee scene"));
    assert!(shot_list.contains("--- Panel 6 ---"));

    let specs = assembler.specs.lock().unwrap();
    let paths: Vec<PathBuf> = specs[0].clips.iter().map(|c| c.image_path.clone()).collect();
    let expected: Vec<PathBuf> = (1..=6).map(|id| layout.panel_path(id)).collect();
    assert_eq!(paths, expected);
    assert_eq!(specs[0].audio, Some(layout.narration_path()));

    let scripts = narrator.scripts.lock().unwrap();
    assert_eq!(scripts[0].1, "voice-42");
    assert!(scripts[0].0.starts_with("Panel 1."));
}

#[tokio::test]
async fn test_partial_generation_blocks_export_with_exact_ids() {
    let p = project();
    let generator = FakeGenerator::failing(&[2, 5]);

    let report = services::generate_storyboard(&p.store, &p.assets, &generator, &coffee_input(&p.photo), |_| {})
        .await
        .unwrap();
    assert_eq!(report.failed_ids(), vec![2, 5]);

    let assembler = FakeAssembler::new();
    let err = services::export_storyboard(
        &p.store,
        None,
        &assembler,
        &VideoConfig::default(),
        &ExportOptions::default(),
    )
    .await
    .unwrap_err();

    match err {
        SpotforgeError::ExportBlocked { panels } => assert_eq!(panels, vec![2, 5]),
        other => panic!("expected ExportBlocked, got {:?}", other),
    }
    assert!(assembler.specs.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_repairs_failed_panel() {
    let p = project();
    let generator = FakeGenerator::failing(&[4]);
    services::generate_storyboard(&p.store, &p.assets, &generator, &coffee_input(&p.photo), |_| {})
        .await
        .unwrap();
    assert!(!p.store.all_panels_ready().unwrap());

    generator.fail.lock().unwrap().clear();
    let record = services::edit_panel(&p.store, &p.assets, &generator, 4, "show the mug from above")
        .await
        .unwrap();

    assert_eq!(record.panel(4).unwrap().status, PanelStatus::Generated);
    assert!(record.panel(4).unwrap().last_error.is_none());
    assert!(p.store.all_panels_ready().unwrap());

    let last = generator.calls.lock().unwrap().last().cloned().unwrap();
    assert_eq!(last.panel_id, 4);
    assert!(last.prompt.contains("show the mug from above"));
    assert_eq!(last.reference_image.as_deref(), Some(p.store.load().unwrap().product_image_path.as_path()));
}

#[tokio::test]
async fn test_edit_add_steam_success_and_failure() {
    let p = project();
    p.store
        .create("A cozy coffee scene", "Warm Lifestyle", Some("#8B4513"), &p.photo)
        .unwrap();
    let old_asset = p.assets.write_panel(3, &encoded(ImageFormat::Png, [1, 1, 1])).unwrap();
    p.store.populate_panel(3, "cup on table", &old_asset).unwrap();

    // failure keeps the old description and asset
    let failing = FakeGenerator::failing(&[3]);
    let err = services::edit_panel(&p.store, &p.assets, &failing, 3, "add steam")
        .await
        .unwrap_err();
    assert!(matches!(err, SpotforgeError::CollaboratorFailure { panel: Some(3), .. }));

    let record = p.store.load().unwrap();
    let panel = record.panel(3).unwrap();
    assert_eq!(panel.scene_description, "cup on table");
    assert_eq!(panel.asset_path.as_deref(), Some(old_asset.as_path()));
    assert_eq!(panel.status, PanelStatus::Failed);

    // success incorporates the instruction
    let record = services::edit_panel(&p.store, &p.assets, &FakeGenerator::new(), 3, "add steam")
        .await
        .unwrap();
    let panel = record.panel(3).unwrap();
    assert!(panel.scene_description.contains("add steam"));
    assert_eq!(panel.status, PanelStatus::Generated);
    assert_eq!(record.panels.len(), 6);
}

#[tokio::test]
async fn test_edit_invalid_panel_id() {
    let p = project();
    p.store
        .create("A cozy coffee scene", "Warm Lifestyle", None, &p.photo)
        .unwrap();
    let generator = FakeGenerator::new();

    let err = services::edit_panel(&p.store, &p.assets, &generator, 7, "anything")
        .await
        .unwrap_err();
    assert!(matches!(err, SpotforgeError::InvalidPanelId(7)));
    assert!(generator.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_and_export_without_project() {
    let p = project();
    let generator = FakeGenerator::new();

    let err = services::edit_panel(&p.store, &p.assets, &generator, 1, "brighter")
        .await
        .unwrap_err();
    assert!(matches!(err, SpotforgeError::ProjectNotFound(_)));

    let err = services::export_storyboard(
        &p.store,
        None,
        &FakeAssembler::new(),
        &VideoConfig::default(),
        &ExportOptions::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SpotforgeError::ProjectNotFound(_)));
}

#[tokio::test]
async fn test_narration_without_narrator_is_configuration_error() {
    let p = project();
    services::generate_storyboard(&p.store, &p.assets, &FakeGenerator::new(), &coffee_input(&p.photo), |_| {})
        .await
        .unwrap();

    let options = ExportOptions {
        narration: true,
        voice_id: "default".to_string(),
    };
    let err = services::export_storyboard(
        &p.store,
        None,
        &FakeAssembler::new(),
        &VideoConfig::default(),
        &options,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SpotforgeError::Configuration(_)));
}

#[tokio::test]
async fn test_deleted_panel_image_blocks_export() {
    let p = project();
    services::generate_storyboard(&p.store, &p.assets, &FakeGenerator::new(), &coffee_input(&p.photo), |_| {})
        .await
        .unwrap();
    std::fs::remove_file(p.store.layout().panel_path(5)).unwrap();

    let err = services::export_storyboard(
        &p.store,
        None,
        &FakeAssembler::new(),
        &VideoConfig::default(),
        &ExportOptions::default(),
    )
    .await
    .unwrap_err();
    match err {
        SpotforgeError::InvalidInput { field, .. } => assert_eq!(field, "panel 5"),
        other => panic!("expected InvalidInput, got {:?}", other),
    }
}
