// SpotForge - storyboard generation from a one-sentence brief
// Orchestrates image, narration and video collaborators around a persisted project record

pub mod cli;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod planner;
pub mod services;
pub mod state;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use error::{SpotforgeError, SpotforgeResult};
pub use models::{Panel, PanelOutcome, PanelStatus, ProjectRecord, StylePreset};
pub use state::{PanelAssets, ProjectLayout, ProjectStore};
