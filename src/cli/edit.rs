use super::spinner;
use crate::models::config::{require_api_key, OPENROUTER_API_KEY_VAR};
use crate::models::SpotforgeConfig;
use crate::orchestrator::OpenRouterClient;
use crate::services;
use crate::state::{PanelAssets, ProjectStore};
use crate::Result;
use colored::Colorize;
use std::path::Path;

pub async fn run(project_root: &Path, panel_id: u32, instruction: &str) -> Result<()> {
    let store = ProjectStore::open(project_root);
    let record = store.load()?;
    let panel = record.panel(panel_id)?;
    if !panel.purpose.is_empty() {
        println!("   Goal: {}", panel.purpose);
    }

    let config = SpotforgeConfig::load(project_root)?;
    let api_key = require_api_key(OPENROUTER_API_KEY_VAR)?;
    let generator = OpenRouterClient::new(api_key, config.image.clone())?
        .with_debug_dir(store.layout().cache.clone());
    let assets = PanelAssets::new(store.layout().clone());

    let pb = spinner(format!("Regenerating panel {}...", panel_id));
    let result = services::edit_panel(&store, &assets, &generator, panel_id, instruction).await;
    pb.finish_and_clear();

    let record = result?;
    let panel = record.panel(panel_id)?;
    println!(
        "{}",
        format!("✅ Panel {} updated successfully!", panel_id).green().bold()
    );
    if let Some(path) = &panel.asset_path {
        println!("   Image: {}", path.display());
    }
    println!("   Edits: {}", panel.edit_history.len());
    Ok(())
}
