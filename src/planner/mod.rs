//! Shot planning
//!
//! Deterministic authoring of the six-panel plan from a brief and a style
//! preset, plus the prompt text handed to the image model.

mod brief;
pub mod prompts;
mod shots;

pub use brief::{infer_product_type, parse_brief, BriefComponents};
pub use prompts::{edit_prompt, image_prompt, revise_description, IMAGE_SYSTEM_PROMPT};
pub use shots::{narration_script, plan_shots, shot_list, title_case, ShotContext, ShotPlan};

use crate::models::ProjectRecord;

impl<'a> ShotContext<'a> {
    /// Context derived from a persisted record and its parsed brief
    pub fn for_record(record: &'a ProjectRecord, brief: &'a BriefComponents) -> Self {
        Self {
            brief,
            preset: record.style.template(),
            product_type: &record.product_type,
            brand_color: record.brand_color.as_deref(),
        }
    }
}

/// Plan all six shots for a freshly created record
pub fn plan_for_record(record: &ProjectRecord) -> Vec<ShotPlan> {
    let brief = parse_brief(&record.goal);
    plan_shots(&ShotContext::for_record(record, &brief))
}
