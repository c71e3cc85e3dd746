use crate::models::config::{require_api_key, ELEVENLABS_API_KEY_VAR};
use crate::models::SpotforgeConfig;
use crate::orchestrator::{ElevenLabsClient, FfmpegAssembler, Narrator};
use crate::services::{export_storyboard, ExportOptions};
use crate::state::ProjectStore;
use crate::Result;
use colored::Colorize;
use std::path::Path;

pub async fn run(project_root: &Path, narration: bool, voice_id: &str) -> Result<()> {
    let store = ProjectStore::open(project_root);
    // Surface a missing or corrupt record before checking narration credentials
    store.load()?;

    let config = SpotforgeConfig::load(project_root)?;
    let narrator = if narration {
        let api_key = require_api_key(ELEVENLABS_API_KEY_VAR)?;
        println!("   Including narration (voice: {})", config.narration.resolve_voice(voice_id));
        Some(ElevenLabsClient::new(api_key, config.narration.clone())?)
    } else {
        None
    };
    let assembler = FfmpegAssembler::new(config.video.clone()).with_progress(true);

    let options = ExportOptions {
        narration,
        voice_id: voice_id.to_string(),
    };
    let summary = export_storyboard(
        &store,
        narrator.as_ref().map(|n| n as &dyn Narrator),
        &assembler,
        &config.video,
        &options,
    )
    .await?;

    println!("{}", "✅ Export complete!".green().bold());
    println!("   Video:     {} ({:.0}s)", summary.video.display(), summary.duration_secs);
    println!("   Shot list: {}", summary.shot_list.display());
    if let Some(path) = &summary.narration {
        println!("   Narration: {}", path.display());
    }
    Ok(())
}
