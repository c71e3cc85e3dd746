//! Error taxonomy for storyboard operations

use crate::orchestrator::{Collaborator, CollaboratorError};
use std::path::PathBuf;

/// Result type for library operations
pub type SpotforgeResult<T> = std::result::Result<T, SpotforgeError>;

/// Errors surfaced to the user by every command
#[derive(Debug, thiserror::Error)]
pub enum SpotforgeError {
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Invalid style '{0}'. Expected one of: Minimal Studio, Warm Lifestyle, Outdoor Natural")]
    InvalidStyle(String),

    #[error("No project found at {}. Run 'spotforge generate' first.", .0.display())]
    ProjectNotFound(PathBuf),

    #[error("Invalid panel id {0}. Panel ids range from 1 to 6.")]
    InvalidPanelId(u32),

    #[error("Project record {} is unreadable: {reason}", .path.display())]
    CorruptOrMissingProject { path: PathBuf, reason: String },

    #[error("{collaborator} failed{}: {source}", panel_suffix(.panel))]
    CollaboratorFailure {
        collaborator: Collaborator,
        panel: Option<u32>,
        #[source]
        source: CollaboratorError,
    },

    #[error("Export blocked: panel(s) {} not generated. Run 'spotforge edit <id> <instruction>' to retry.", join_ids(.panels))]
    ExportBlocked { panels: Vec<u32> },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SpotforgeError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::CorruptOrMissingProject {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn collaborator(
        collaborator: Collaborator,
        panel: Option<u32>,
        source: CollaboratorError,
    ) -> Self {
        Self::CollaboratorFailure {
            collaborator,
            panel,
            source,
        }
    }
}

fn panel_suffix(panel: &Option<u32>) -> String {
    panel.map(|id| format!(" for panel {}", id)).unwrap_or_default()
}

fn join_ids(ids: &[u32]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_blocked_names_panels() {
        let err = SpotforgeError::ExportBlocked {
            panels: vec![2, 5],
        };
        assert!(err.to_string().contains("panel(s) 2, 5"));
    }

    #[test]
    fn test_collaborator_failure_names_panel() {
        let err = SpotforgeError::collaborator(
            Collaborator::ImageGeneration,
            Some(3),
            CollaboratorError::RateLimited("slow down".to_string()),
        );
        let msg = err.to_string();
        assert!(msg.contains("Image generation"));
        assert!(msg.contains("panel 3"));
        assert!(msg.contains("slow down"));
    }

    #[test]
    fn test_invalid_input_names_field() {
        let err = SpotforgeError::invalid_input("brand_color", "expected #RRGGBB");
        assert_eq!(err.to_string(), "Invalid brand_color: expected #RRGGBB");
    }
}
