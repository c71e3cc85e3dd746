use super::spinner;
use crate::models::config::{require_api_key, OPENROUTER_API_KEY_VAR};
use crate::models::{PanelOutcome, SpotforgeConfig};
use crate::orchestrator::OpenRouterClient;
use crate::services::{generate_storyboard, GenerateStoryboardInput, GenerationEvent};
use crate::state::{PanelAssets, ProjectStore};
use crate::Result;
use colored::Colorize;
use dialoguer::Confirm;
use indicatif::ProgressBar;
use std::io::IsTerminal;
use std::path::Path;

pub async fn run(
    project_root: &Path,
    brief: &str,
    image: &Path,
    style: &str,
    color: Option<&str>,
    yes: bool,
) -> Result<()> {
    let input = GenerateStoryboardInput {
        brief: brief.to_string(),
        product_image: image.to_path_buf(),
        style: style.to_string(),
        brand_color: color.map(str::to_string),
    };
    input.validate()?;

    let config = SpotforgeConfig::load(project_root)?;
    let api_key = require_api_key(OPENROUTER_API_KEY_VAR)?;
    let store = ProjectStore::open(project_root);

    if store.exists() && !yes && std::io::stdin().is_terminal() {
        let overwrite = Confirm::new()
            .with_prompt("A storyboard already exists here. Overwrite it?")
            .default(false)
            .interact()?;
        if !overwrite {
            println!("{}", "Keeping the existing storyboard".yellow());
            return Ok(());
        }
    }

    let generator = OpenRouterClient::new(api_key, config.image.clone())?
        .with_debug_dir(store.layout().cache.clone());

    println!("   Brief:   {}", brief);
    println!("   Image:   {}", image.display());
    println!("   Style:   {}", style);
    if let Some(color) = color {
        println!("   Color:   {}", color);
    }
    println!("   Model:   {}", generator.model());
    println!();

    let assets = PanelAssets::new(store.layout().clone());

    let mut progress: Option<ProgressBar> = None;
    let report = generate_storyboard(&store, &assets, &generator, &input, |event| match event {
        GenerationEvent::Planned { record_path } => {
            println!("{}", format!("📝 Shot plan saved to {}", record_path.display()).cyan());
        }
        GenerationEvent::PanelStarted { id, purpose } => {
            progress = Some(spinner(format!("Panel {}: {}", id, purpose)));
        }
        GenerationEvent::PanelFinished { id, outcome } => {
            if let Some(pb) = progress.take() {
                pb.finish_and_clear();
            }
            match outcome {
                PanelOutcome::Generated(path) => {
                    println!("   {} Panel {} → {}", "✓".green(), id, path.display())
                }
                PanelOutcome::Failed(reason) => {
                    println!("   {} Panel {} failed: {}", "✗".red(), id, reason.red())
                }
                PanelOutcome::Pending => {}
            }
        }
    })
    .await;

    if let Some(pb) = progress.take() {
        pb.finish_and_clear();
    }
    let report = report?;

    println!();
    if report.is_complete() {
        println!("{}", "✅ Storyboard generation complete!".green().bold());
        println!("   Next: spotforge export");
        Ok(())
    } else {
        let ids = report
            .failed_ids()
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        anyhow::bail!(
            "{} of 6 panels failed ({}). Run 'spotforge edit <id> <instruction>' to retry them.",
            report.failed.len(),
            ids
        )
    }
}
