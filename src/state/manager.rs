//! ProjectStore - shot_plan.json lifecycle operations

use super::{write_atomic, PanelAssets, ProjectLayout};
use crate::error::{SpotforgeError, SpotforgeResult};
use crate::models::{PanelStatus, ProjectRecord, StylePreset};
use crate::orchestrator::{Collaborator, ImageGenerator, ImageRequest};
use crate::planner::{edit_prompt, infer_product_type, parse_brief, revise_description, ShotContext, ShotPlan};
use image::ImageFormat;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, instrument, warn};

const ACCEPTED_FORMATS: [ImageFormat; 3] = [ImageFormat::Png, ImageFormat::Jpeg, ImageFormat::WebP];

fn hex_color_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6})$").expect("static regex is valid")
    })
}

/// Checked arguments for a new project record
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectInputs {
    pub goal: String,
    pub style: StylePreset,
    pub brand_color: Option<String>,
    /// Canonicalized product photo path
    pub product_image_path: PathBuf,
}

impl ProjectInputs {
    /// Validate brief, style, brand color and product photo without touching
    /// the project directory
    pub fn validate(
        goal: &str,
        style: &str,
        brand_color: Option<&str>,
        product_image_path: &Path,
    ) -> SpotforgeResult<Self> {
        let goal = goal.trim();
        if goal.is_empty() {
            return Err(SpotforgeError::invalid_input("brief", "must not be empty"));
        }

        Ok(Self {
            goal: goal.to_string(),
            style: style.parse()?,
            brand_color: validate_brand_color(brand_color)?,
            product_image_path: validate_product_image(product_image_path)?,
        })
    }
}

/// Owner of the persisted project record
#[derive(Debug, Clone)]
pub struct ProjectStore {
    layout: ProjectLayout,
}

impl ProjectStore {
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self::new(ProjectLayout::new(root))
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    pub fn record_path(&self) -> PathBuf {
        self.layout.record_path()
    }

    pub fn exists(&self) -> bool {
        self.record_path().is_file()
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Validate inputs and persist a fresh record with six pending panels.
    ///
    /// Overwrites any existing record.
    #[instrument(skip(self, goal), fields(root = %self.layout.root.display()))]
    pub fn create(
        &self,
        goal: &str,
        style: &str,
        brand_color: Option<&str>,
        product_image_path: &Path,
    ) -> SpotforgeResult<ProjectRecord> {
        let inputs = ProjectInputs::validate(goal, style, brand_color, product_image_path)?;

        self.layout.ensure_dirs()?;

        let product_type = infer_product_type(&inputs.goal);
        let mut record = ProjectRecord::new(
            inputs.goal,
            inputs.style,
            inputs.brand_color,
            inputs.product_image_path,
        );
        record.product_type = product_type;
        self.save(&mut record)?;

        info!(style = %record.style, product_type = %record.product_type, "project created");
        Ok(record)
    }

    /// Write planned purposes and descriptions into still-pending panels
    pub fn plan_panels(&self, shots: &[ShotPlan]) -> SpotforgeResult<ProjectRecord> {
        let mut record = self.load()?;
        for shot in shots {
            let panel = record.panel_mut(shot.id)?;
            if panel.status == PanelStatus::Pending {
                panel.purpose = shot.purpose.clone();
                panel.scene_description = shot.scene_description.clone();
            }
        }
        self.save(&mut record)?;
        Ok(record)
    }

    // =========================================================================
    // Panel Transitions
    // =========================================================================

    /// Record a generated asset for a panel
    pub fn populate_panel(
        &self,
        id: u32,
        scene_description: impl Into<String>,
        asset_path: impl Into<PathBuf>,
    ) -> SpotforgeResult<ProjectRecord> {
        let mut record = self.load()?;
        let panel = record.panel_mut(id)?;
        panel.scene_description = scene_description.into();
        panel.asset_path = Some(asset_path.into());
        panel.status = PanelStatus::Generated;
        panel.last_error = None;
        self.save(&mut record)?;

        debug!(panel = id, "panel populated");
        Ok(record)
    }

    /// Mark a panel failed, leaving its description and asset untouched
    pub fn mark_failed(&self, id: u32, reason: impl Into<String>) -> SpotforgeResult<ProjectRecord> {
        let mut record = self.load()?;
        let panel = record.panel_mut(id)?;
        panel.status = PanelStatus::Failed;
        panel.last_error = Some(reason.into());
        self.save(&mut record)?;
        Ok(record)
    }

    /// Regenerate one panel from its current description revised by `instruction`
    #[instrument(skip(self, generator, assets), fields(panel = id))]
    pub async fn edit_panel(
        &self,
        id: u32,
        instruction: &str,
        generator: &dyn ImageGenerator,
        assets: &PanelAssets,
    ) -> SpotforgeResult<ProjectRecord> {
        let mut record = self.load()?;
        record.panel(id)?;

        let instruction = instruction.trim();
        if instruction.is_empty() {
            return Err(SpotforgeError::invalid_input("instruction", "must not be empty"));
        }

        let prompt = {
            let brief = parse_brief(&record.goal);
            let ctx = ShotContext::for_record(&record, &brief);
            edit_prompt(&record, record.panel(id)?, instruction, &ctx)
        };
        let request = ImageRequest {
            panel_id: id,
            prompt,
            reference_image: Some(record.product_image_path.clone()),
        };

        let outcome = match generator.generate(&request).await {
            Ok(bytes) => assets.write_panel(id, &bytes),
            Err(e) => Err(SpotforgeError::collaborator(
                Collaborator::ImageGeneration,
                Some(id),
                e,
            )),
        };

        match outcome {
            Ok(asset_path) => {
                let panel = record.panel_mut(id)?;
                panel.scene_description = revise_description(&panel.scene_description, instruction);
                panel.asset_path = Some(asset_path);
                panel.status = PanelStatus::Generated;
                panel.edit_history.push(instruction.to_string());
                panel.last_error = None;
                self.save(&mut record)?;

                info!("panel edited");
                Ok(record)
            }
            Err(err) => {
                if let SpotforgeError::CollaboratorFailure { source, .. } = &err {
                    let panel = record.panel_mut(id)?;
                    panel.status = PanelStatus::Failed;
                    panel.last_error = Some(source.to_string());
                    warn!(error = %err, "panel edit failed");
                    if let Err(save_err) = self.save(&mut record) {
                        warn!(error = %save_err, "failed to record panel failure");
                        return Err(match save_err {
                            SpotforgeError::CorruptOrMissingProject { path, reason } => {
                                SpotforgeError::corrupt(path, format!("{}; edit error was: {}", reason, err))
                            }
                            other => other,
                        });
                    }
                }
                Err(err)
            }
        }
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Load and structurally check the record
    pub fn load(&self) -> SpotforgeResult<ProjectRecord> {
        let path = self.record_path();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SpotforgeError::ProjectNotFound(path));
            }
            Err(e) => return Err(SpotforgeError::corrupt(&path, e)),
        };

        let record: ProjectRecord =
            serde_json::from_str(&content).map_err(|e| SpotforgeError::corrupt(&path, e))?;
        record
            .check_structure()
            .map_err(|reason| SpotforgeError::corrupt(&path, reason))?;
        Ok(record)
    }

    /// Persist the record atomically, refreshing `updated_at`
    pub fn save(&self, record: &mut ProjectRecord) -> SpotforgeResult<()> {
        let path = self.record_path();
        record.touch();
        let content = serde_json::to_string_pretty(record)
            .map_err(|e| SpotforgeError::corrupt(&path, e))?;
        write_atomic(&path, content.as_bytes())
            .map_err(|e| SpotforgeError::corrupt(&path, format!("failed to write: {}", e)))?;
        Ok(())
    }

    pub fn all_panels_ready(&self) -> SpotforgeResult<bool> {
        Ok(self.load()?.all_panels_ready())
    }
}

fn validate_brand_color(color: Option<&str>) -> SpotforgeResult<Option<String>> {
    match color.map(str::trim).filter(|c| !c.is_empty()) {
        None => Ok(None),
        Some(c) if hex_color_regex().is_match(c) => Ok(Some(c.to_string())),
        Some(c) => Err(SpotforgeError::invalid_input(
            "brand_color",
            format!("'{}' is not a hex color like #FF5733", c),
        )),
    }
}

/// Resolve the product photo and confirm it decodes as PNG, JPEG or WebP
fn validate_product_image(path: &Path) -> SpotforgeResult<PathBuf> {
    let field = "product_image_path";
    if !path.is_file() {
        return Err(SpotforgeError::invalid_input(
            field,
            format!("{} does not exist", path.display()),
        ));
    }

    let reader = image::ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| SpotforgeError::invalid_input(field, format!("{}: {}", path.display(), e)))?;

    match reader.format() {
        Some(format) if ACCEPTED_FORMATS.contains(&format) => {}
        _ => {
            return Err(SpotforgeError::invalid_input(
                field,
                format!("{} is not a PNG, JPEG or WebP image", path.display()),
            ));
        }
    }

    reader.decode().map_err(|e| {
        SpotforgeError::invalid_input(field, format!("{} could not be decoded: {}", path.display(), e))
    })?;

    Ok(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
}
