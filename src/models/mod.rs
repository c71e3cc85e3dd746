pub mod config;
pub mod panel;
pub mod project;
pub mod style;

pub use config::{ImageConfig, NarrationConfig, SpotforgeConfig, VideoConfig};
pub use panel::{Panel, PanelOutcome, PanelStatus, PANEL_COUNT};
pub use project::{panel_index, ProjectRecord};
pub use style::{PresetTemplate, StylePreset};
