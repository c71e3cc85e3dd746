use crate::error::{SpotforgeError, SpotforgeResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "spotforge.toml";
pub const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const ELEVENLABS_API_KEY_VAR: &str = "ELEVENLABS_API_KEY";

// =============================================================================
// Image generation
// =============================================================================

/// OpenRouter image model settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImageConfig {
    pub model: String,
    pub base_url: String,
    /// Sent as `HTTP-Referer` for OpenRouter attribution
    pub referer: String,
    /// Sent as `X-Title`
    pub title: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Additional attempts after the first failure
    pub retries: u32,
    pub retry_delay_secs: u64,
    pub timeout_secs: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            model: "google/gemini-2.5-flash-image-preview".to_string(),
            base_url: "https://openrouter.ai/api/v1/chat/completions".to_string(),
            referer: "http://localhost:3000".to_string(),
            title: "SpotForge".to_string(),
            max_tokens: 1000,
            temperature: 0.7,
            retries: 3,
            retry_delay_secs: 5,
            timeout_secs: 120,
        }
    }
}

impl ImageConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Narration
// =============================================================================

/// ElevenLabs text-to-speech settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NarrationConfig {
    pub base_url: String,
    pub model_id: String,
    /// Voice used when `--voice-id` is left at `default`
    pub default_voice_id: String,
    pub timeout_secs: u64,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.elevenlabs.io/v1".to_string(),
            model_id: "eleven_multilingual_v2".to_string(),
            default_voice_id: "21m00Tcm4TlvDq8ikWAM".to_string(),
            timeout_secs: 120,
        }
    }
}

impl NarrationConfig {
    /// Resolve the CLI voice argument, mapping `default` to the configured voice
    pub fn resolve_voice<'a>(&'a self, requested: &'a str) -> &'a str {
        if requested.is_empty() || requested.eq_ignore_ascii_case("default") {
            &self.default_voice_id
        } else {
            requested
        }
    }
}

// =============================================================================
// Video
// =============================================================================

/// Slideshow encoding settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VideoConfig {
    pub panel_seconds: f64,
    pub transition_seconds: f64,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub ffmpeg_path: PathBuf,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            panel_seconds: 6.0,
            transition_seconds: 1.0,
            fps: 24,
            width: 1920,
            height: 1080,
            ffmpeg_path: PathBuf::from("ffmpeg"),
        }
    }
}

// =============================================================================
// SpotForge Configuration
// =============================================================================

/// Project configuration read from `spotforge.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpotforgeConfig {
    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub narration: NarrationConfig,

    #[serde(default)]
    pub video: VideoConfig,
}

impl SpotforgeConfig {
    /// Load config from `spotforge.toml`, falling back to defaults when absent
    pub fn load(project_root: &Path) -> SpotforgeResult<Self> {
        let config_path = project_root.join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| {
            SpotforgeError::Configuration(format!("failed to read {}: {}", config_path.display(), e))
        })?;
        let config: SpotforgeConfig = toml::from_str(&content).map_err(|e| {
            SpotforgeError::Configuration(format!("failed to parse {}: {}", config_path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to `spotforge.toml`
    pub fn save(&self, project_root: &Path) -> SpotforgeResult<()> {
        let config_path = project_root.join(CONFIG_FILENAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| SpotforgeError::Configuration(e.to_string()))?;
        std::fs::write(&config_path, content).map_err(|e| {
            SpotforgeError::Configuration(format!("failed to write {}: {}", config_path.display(), e))
        })?;
        Ok(())
    }

    pub fn validate(&self) -> SpotforgeResult<()> {
        let video = &self.video;
        if video.panel_seconds <= 0.0 {
            return Err(SpotforgeError::Configuration(
                "video.panel_seconds must be positive".to_string(),
            ));
        }
        if video.transition_seconds < 0.0 || video.transition_seconds >= video.panel_seconds {
            return Err(SpotforgeError::Configuration(
                "video.transition_seconds must be >= 0 and shorter than video.panel_seconds"
                    .to_string(),
            ));
        }
        if video.fps == 0 || video.width == 0 || video.height == 0 {
            return Err(SpotforgeError::Configuration(
                "video.fps, video.width and video.height must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Read an API key from the environment, treating blank values as missing
pub fn api_key(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn require_api_key(var: &str) -> SpotforgeResult<String> {
    api_key(var).ok_or_else(|| {
        SpotforgeError::Configuration(format!(
            "{} not found in environment variables (.env file)",
            var
        ))
    })
}
