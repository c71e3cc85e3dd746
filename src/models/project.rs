use super::panel::{Panel, PanelStatus, PANEL_COUNT};
use super::style::StylePreset;
use crate::error::{SpotforgeError, SpotforgeResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_product_type() -> String {
    "product".to_string()
}

/// Persisted storyboard state, the single source of truth between commands
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectRecord {
    /// One-sentence brief as entered by the user
    pub goal: String,

    pub style: StylePreset,

    /// Hex color (`#RRGGBB` or `#RGB`)
    pub brand_color: Option<String>,

    /// Reference product photo, immutable once set
    pub product_image_path: PathBuf,

    /// Product noun inferred from the brief
    #[serde(default = "default_product_type")]
    pub product_type: String,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,

    pub panels: Vec<Panel>,
}

/// Map a panel id to its index, rejecting anything outside 1..=6
pub fn panel_index(id: u32) -> SpotforgeResult<usize> {
    if (1..=PANEL_COUNT).contains(&id) {
        Ok((id - 1) as usize)
    } else {
        Err(SpotforgeError::InvalidPanelId(id))
    }
}

impl ProjectRecord {
    /// Fresh record with six pending panels
    pub fn new(
        goal: impl Into<String>,
        style: StylePreset,
        brand_color: Option<String>,
        product_image_path: impl Into<PathBuf>,
    ) -> Self {
        let now = Utc::now();
        Self {
            goal: goal.into(),
            style,
            brand_color,
            product_image_path: product_image_path.into(),
            product_type: default_product_type(),
            created_at: Some(now),
            updated_at: Some(now),
            panels: (1..=PANEL_COUNT).map(Panel::pending).collect(),
        }
    }

    pub fn panel(&self, id: u32) -> SpotforgeResult<&Panel> {
        let index = panel_index(id)?;
        self.panels
            .get(index)
            .ok_or(SpotforgeError::InvalidPanelId(id))
    }

    pub fn panel_mut(&mut self, id: u32) -> SpotforgeResult<&mut Panel> {
        let index = panel_index(id)?;
        self.panels
            .get_mut(index)
            .ok_or(SpotforgeError::InvalidPanelId(id))
    }

    /// Check the six-panel shape: exactly six entries with ids 1..=6 in order.
    ///
    /// Returns a description of the first violation.
    pub fn check_structure(&self) -> Result<(), String> {
        if self.panels.len() != PANEL_COUNT as usize {
            return Err(format!(
                "expected {} panels, found {}",
                PANEL_COUNT,
                self.panels.len()
            ));
        }

        for (index, panel) in self.panels.iter().enumerate() {
            let expected = index as u32 + 1;
            if panel.id != expected {
                return Err(format!(
                    "panel at position {} has id {} (expected {})",
                    expected, panel.id, expected
                ));
            }
            if panel.status == PanelStatus::Generated && panel.asset_path.is_none() {
                return Err(format!("panel {} is generated but has no asset_path", panel.id));
            }
        }

        Ok(())
    }

    pub fn all_panels_ready(&self) -> bool {
        self.panels.len() == PANEL_COUNT as usize && self.panels.iter().all(Panel::is_ready)
    }

    /// Ids of panels that are not yet generated
    pub fn blocking_panels(&self) -> Vec<u32> {
        self.panels
            .iter()
            .filter(|p| !p.is_ready())
            .map(|p| p.id)
            .collect()
    }

    pub fn ensure_exportable(&self) -> SpotforgeResult<()> {
        let blocking = self.blocking_panels();
        if blocking.is_empty() && self.all_panels_ready() {
            Ok(())
        } else {
            Err(SpotforgeError::ExportBlocked { panels: blocking })
        }
    }

    /// Generated asset paths in ascending panel id order
    pub fn asset_paths(&self) -> Vec<PathBuf> {
        self.panels
            .iter()
            .filter_map(|p| p.asset_path.clone())
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}
