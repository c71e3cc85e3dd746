use crate::models::config::{
    api_key, ELEVENLABS_API_KEY_VAR, OPENROUTER_API_KEY_VAR,
};
use crate::models::SpotforgeConfig;
use crate::state::ProjectLayout;
use crate::Result;
use colored::Colorize;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Configuration problems found while initializing
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

pub async fn run(project_root: &Path) -> Result<()> {
    println!("{}", "🎬 Initializing SpotForge...".cyan().bold());
    println!();

    let layout = ProjectLayout::new(project_root);
    layout.ensure_dirs()?;
    println!("{}", "📁 Directories ensured:".cyan());
    for dir in layout.dirs() {
        let name = dir.strip_prefix(project_root).unwrap_or(dir);
        println!("   ✓ {}/", name.display());
    }

    let config_path = layout.config_path();
    let config = if config_path.exists() {
        let config = SpotforgeConfig::load(project_root)?;
        println!("   ✓ {} (existing, valid)", config_path.display());
        config
    } else {
        let config = SpotforgeConfig::default();
        config.save(project_root)?;
        println!("   ✓ {} (defaults written)", config_path.display());
        config
    };

    let report = check_environment(&config).await;

    println!();
    for warning in &report.warnings {
        println!("   {} {}", "⚠️".yellow(), warning.yellow());
    }

    if !report.errors.is_empty() {
        println!("{}", "Configuration Issues Found:".red().bold());
        for error in &report.errors {
            println!("   - {}", error.red());
        }
        anyhow::bail!("Please fix the issues above and run 'spotforge init' again");
    }

    println!("{}", "✅ Configuration OK.".green().bold());
    println!();
    println!("{}", "Next:".cyan());
    println!("   spotforge generate --brief \"...\" --image product.png");
    Ok(())
}

/// API keys are errors when the image key is missing, warnings otherwise
pub async fn check_environment(config: &SpotforgeConfig) -> InitReport {
    let mut report = InitReport::default();

    if api_key(OPENROUTER_API_KEY_VAR).is_none() {
        report.errors.push(format!(
            "{} not found in environment variables (.env file)",
            OPENROUTER_API_KEY_VAR
        ));
    }

    if api_key(ELEVENLABS_API_KEY_VAR).is_none() {
        report.warnings.push(format!(
            "{} not set; 'export --narration' will be unavailable",
            ELEVENLABS_API_KEY_VAR
        ));
    }

    if !ffmpeg_available(&config.video.ffmpeg_path).await {
        report.warnings.push(format!(
            "'{}' not found; 'export' needs ffmpeg to assemble the video",
            config.video.ffmpeg_path.display()
        ));
    }

    report
}

async fn ffmpeg_available(path: &Path) -> bool {
    Command::new(path)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_ffmpeg_is_only_a_warning() {
        let mut config = SpotforgeConfig::default();
        config.video.ffmpeg_path = PathBuf::from("/nonexistent/ffmpeg");

        let report = check_environment(&config).await;
        assert!(report.warnings.iter().any(|w| w.contains("/nonexistent/ffmpeg")));
        assert!(report.errors.iter().all(|e| !e.contains("ffmpeg")));
    }
}
