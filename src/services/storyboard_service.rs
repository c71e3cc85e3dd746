//! Storyboard service - generate and edit workflows
//!
//! Generation is create, plan, persist, then one image call per panel in id
//! order. A failing panel is recorded and the batch moves on.

use crate::error::{SpotforgeError, SpotforgeResult};
use crate::models::{PanelOutcome, ProjectRecord};
use crate::orchestrator::{Collaborator, ImageGenerator, ImageRequest};
use crate::planner::{image_prompt, parse_brief, plan_for_record, ShotContext};
use crate::state::{PanelAssets, ProjectInputs, ProjectStore};
use std::path::PathBuf;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct GenerateStoryboardInput {
    pub brief: String,
    pub product_image: PathBuf,
    pub style: String,
    pub brand_color: Option<String>,
}

impl GenerateStoryboardInput {
    /// Check the arguments before any collaborator is configured
    pub fn validate(&self) -> SpotforgeResult<ProjectInputs> {
        ProjectInputs::validate(
            &self.brief,
            &self.style,
            self.brand_color.as_deref(),
            &self.product_image,
        )
    }
}

/// Progress notifications emitted while generating
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    /// Record created and six shots planned
    Planned { record_path: PathBuf },
    PanelStarted { id: u32, purpose: String },
    PanelFinished { id: u32, outcome: PanelOutcome },
}

/// Per-panel results of a generation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationReport {
    pub generated: Vec<u32>,
    /// Panel id and failure message
    pub failed: Vec<(u32, String)>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn failed_ids(&self) -> Vec<u32> {
        self.failed.iter().map(|(id, _)| *id).collect()
    }
}

struct PanelJob {
    id: u32,
    purpose: String,
    scene_description: String,
    prompt: String,
}

fn panel_jobs(record: &ProjectRecord) -> Vec<PanelJob> {
    let brief = parse_brief(&record.goal);
    let ctx = ShotContext::for_record(record, &brief);
    record
        .panels
        .iter()
        .map(|panel| PanelJob {
            id: panel.id,
            purpose: panel.purpose.clone(),
            scene_description: panel.scene_description.clone(),
            prompt: image_prompt(record, panel, &ctx),
        })
        .collect()
}

/// Create a new project and generate all six panels
#[instrument(skip_all, fields(style = %input.style))]
pub async fn generate_storyboard(
    store: &ProjectStore,
    assets: &PanelAssets,
    generator: &dyn ImageGenerator,
    input: &GenerateStoryboardInput,
    mut observer: impl FnMut(GenerationEvent),
) -> SpotforgeResult<GenerationReport> {
    let record = store.create(
        &input.brief,
        &input.style,
        input.brand_color.as_deref(),
        &input.product_image,
    )?;
    let record = store.plan_panels(&plan_for_record(&record))?;
    observer(GenerationEvent::Planned {
        record_path: store.record_path(),
    });

    let mut report = GenerationReport::default();
    for job in panel_jobs(&record) {
        observer(GenerationEvent::PanelStarted {
            id: job.id,
            purpose: job.purpose.clone(),
        });

        let request = ImageRequest {
            panel_id: job.id,
            prompt: job.prompt,
            reference_image: Some(record.product_image_path.clone()),
        };

        let written = match generator.generate(&request).await {
            Ok(bytes) => assets.write_panel(job.id, &bytes),
            Err(e) => Err(SpotforgeError::collaborator(
                Collaborator::ImageGeneration,
                Some(job.id),
                e,
            )),
        };

        let outcome = match written {
            Ok(path) => {
                store.populate_panel(job.id, job.scene_description, &path)?;
                report.generated.push(job.id);
                PanelOutcome::Generated(path)
            }
            Err(SpotforgeError::CollaboratorFailure { source, .. }) => {
                let reason = source.to_string();
                warn!(panel = job.id, error = %reason, "panel generation failed");
                store.mark_failed(job.id, reason.clone())?;
                report.failed.push((job.id, reason.clone()));
                PanelOutcome::Failed(reason)
            }
            Err(other) => return Err(other),
        };

        observer(GenerationEvent::PanelFinished {
            id: job.id,
            outcome,
        });
    }

    info!(
        generated = report.generated.len(),
        failed = report.failed.len(),
        "storyboard generation finished"
    );
    Ok(report)
}

/// Regenerate one panel with a natural-language instruction
pub async fn edit_panel(
    store: &ProjectStore,
    assets: &PanelAssets,
    generator: &dyn ImageGenerator,
    id: u32,
    instruction: &str,
) -> SpotforgeResult<ProjectRecord> {
    store.edit_panel(id, instruction, generator, assets).await
}
