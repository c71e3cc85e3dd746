//! Service layer for spotforge
//!
//! Storyboard workflows composed from the project store, the shot planner
//! and the external collaborators. CLI commands stay thin wrappers over
//! these functions.

pub mod export_service;
pub mod storyboard_service;

pub use export_service::{build_video_spec, export_storyboard, ExportOptions, ExportSummary};
pub use storyboard_service::{
    edit_panel, generate_storyboard, GenerateStoryboardInput, GenerationEvent, GenerationReport,
};
