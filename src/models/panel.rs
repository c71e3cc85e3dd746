use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of panels in every storyboard
pub const PANEL_COUNT: u32 = 6;

/// Generation state of a panel
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PanelStatus {
    #[default]
    Pending,
    Generated,
    Failed,
}

impl PanelStatus {
    pub fn name(&self) -> &'static str {
        match self {
            PanelStatus::Pending => "pending",
            PanelStatus::Generated => "generated",
            PanelStatus::Failed => "failed",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            PanelStatus::Pending => "⏳",
            PanelStatus::Generated => "✅",
            PanelStatus::Failed => "❌",
        }
    }
}

/// One storyboard frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Panel {
    /// Position 1..=6, fixed at creation
    pub id: u32,

    pub scene_description: String,

    pub asset_path: Option<PathBuf>,

    pub status: PanelStatus,

    /// Narrative goal of the shot
    #[serde(default)]
    pub purpose: String,

    /// Edit instructions applied successfully, oldest first
    #[serde(default)]
    pub edit_history: Vec<String>,

    /// Most recent collaborator failure
    #[serde(default)]
    pub last_error: Option<String>,
}

impl Panel {
    pub fn pending(id: u32) -> Self {
        Self {
            id,
            scene_description: String::new(),
            asset_path: None,
            status: PanelStatus::Pending,
            purpose: String::new(),
            edit_history: Vec::new(),
            last_error: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == PanelStatus::Generated
    }

    /// Outcome view of the panel's current state
    pub fn outcome(&self) -> PanelOutcome {
        match (self.status, &self.asset_path) {
            (PanelStatus::Generated, Some(path)) => PanelOutcome::Generated(path.clone()),
            (PanelStatus::Failed, _) => PanelOutcome::Failed(
                self.last_error
                    .clone()
                    .unwrap_or_else(|| "unknown error".to_string()),
            ),
            _ => PanelOutcome::Pending,
        }
    }
}

/// Result of one panel generation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelOutcome {
    Generated(PathBuf),
    Failed(String),
    Pending,
}
