use crate::models::{Panel, PanelOutcome, PanelStatus, ProjectRecord};
use crate::state::ProjectStore;
use crate::Result;
use colored::{ColoredString, Colorize};
use std::path::Path;

pub async fn run(project_root: &Path, json: bool) -> Result<()> {
    let store = ProjectStore::open(project_root);
    let record = store.load()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    print_summary(&record);
    Ok(())
}

fn status_label(status: PanelStatus) -> ColoredString {
    match status {
        PanelStatus::Pending => status.name().yellow(),
        PanelStatus::Generated => status.name().green(),
        PanelStatus::Failed => status.name().red(),
    }
}

/// Asset path of a generated panel or the error of a failed one
fn panel_detail(panel: &Panel) -> Option<ColoredString> {
    match panel.outcome() {
        PanelOutcome::Generated(path) => Some(path.display().to_string().bright_black()),
        PanelOutcome::Failed(reason) => Some(reason.red()),
        PanelOutcome::Pending => None,
    }
}

fn print_summary(record: &ProjectRecord) {
    println!("{}", "Storyboard status".cyan().bold());
    println!();
    println!("   Brief:   {}", record.goal);
    println!("   Style:   {}", record.style);
    if let Some(color) = &record.brand_color {
        println!("   Color:   {}", color);
    }
    println!("   Product: {} ({})", record.product_type, record.product_image_path.display());
    if let Some(updated) = &record.updated_at {
        println!("   Updated: {}", updated.format("%Y-%m-%d %H:%M:%S"));
    }
    println!();

    for panel in &record.panels {
        println!(
            "   {} Panel {}  {}",
            panel.status.emoji(),
            panel.id,
            status_label(panel.status)
        );
        if !panel.purpose.is_empty() {
            println!("      {}", panel.purpose.bright_black());
        }
        if let Some(detail) = panel_detail(panel) {
            println!("      {}", detail);
        }
        if !panel.edit_history.is_empty() {
            println!("      edits: {}", panel.edit_history.join(" → "));
        }
    }

    println!();
    let blocking = record.blocking_panels();
    if blocking.is_empty() {
        println!("{}", "Ready to export: spotforge export".green());
    } else {
        let ids = blocking
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        println!("{}", format!("Not ready to export: panel(s) {}", ids).yellow());
    }
}
