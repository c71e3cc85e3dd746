//! External collaborators
//!
//! Image generation, narration and video assembly are opaque services. The
//! storyboard workflows only see the traits below; concrete adapters talk to
//! OpenRouter, ElevenLabs and a local `ffmpeg`.

pub mod elevenlabs;
pub mod ffmpeg;
pub mod openrouter;

pub use elevenlabs::ElevenLabsClient;
pub use ffmpeg::FfmpegAssembler;
pub use openrouter::OpenRouterClient;

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

/// Which external service a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    ImageGeneration,
    Narration,
    VideoAssembly,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::ImageGeneration => "Image generation",
            Collaborator::Narration => "Narration",
            Collaborator::VideoAssembly => "Video assembly",
        };
        f.write_str(name)
    }
}

/// Failure reported by a collaborator
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl CollaboratorError {
    /// Whether another attempt may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CollaboratorError::RateLimited(_)
                | CollaboratorError::Network(_)
                | CollaboratorError::InvalidResponse(_)
                | CollaboratorError::Unavailable(_)
        )
    }

    /// Classify a non-success HTTP status
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = format!("HTTP {}: {}", status, truncate(body, 500));
        match status {
            401 | 403 => CollaboratorError::Auth(message),
            429 => CollaboratorError::RateLimited(message),
            500..=599 => CollaboratorError::Unavailable(message),
            _ => CollaboratorError::InvalidRequest(message),
        }
    }
}

impl From<reqwest::Error> for CollaboratorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CollaboratorError::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            CollaboratorError::InvalidRequest(err.to_string())
        } else {
            CollaboratorError::Network(err.to_string())
        }
    }
}

pub(crate) fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...[truncated]", head)
    } else {
        s.to_string()
    }
}

/// One panel image request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub panel_id: u32,
    pub prompt: String,
    /// Product photo to fuse into the scene
    pub reference_image: Option<PathBuf>,
}

/// Transition between consecutive clips
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Cut straight to the next clip
    None,
    /// Crossfade overlapping the next clip by the given seconds
    Crossfade(f64),
}

impl Transition {
    pub fn overlap(&self) -> f64 {
        match self {
            Transition::None => 0.0,
            Transition::Crossfade(seconds) => *seconds,
        }
    }
}

/// One still image in the slideshow
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSpec {
    pub image_path: PathBuf,
    /// Display time in seconds, including the transition overlap
    pub duration: f64,
    /// Transition into the following clip
    pub transition: Transition,
}

/// Ordered slideshow plus optional narration track
#[derive(Debug, Clone, PartialEq)]
pub struct VideoSpec {
    pub clips: Vec<ClipSpec>,
    pub audio: Option<PathBuf>,
    pub output: PathBuf,
}

impl VideoSpec {
    /// Playback length after transition overlaps
    pub fn total_duration(&self) -> f64 {
        let overlaps: f64 = self
            .clips
            .iter()
            .take(self.clips.len().saturating_sub(1))
            .map(|c| c.transition.overlap())
            .sum();
        self.clips.iter().map(|c| c.duration).sum::<f64>() - overlaps
    }
}

/// Prompt (plus reference photo) in, image bytes out
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>, CollaboratorError>;
}

/// Text plus voice in, audio bytes out
#[async_trait]
pub trait Narrator: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, CollaboratorError>;
}

/// Ordered stills plus optional audio in, encoded video file out
#[async_trait]
pub trait VideoAssembler: Send + Sync {
    async fn assemble(&self, spec: &VideoSpec) -> Result<PathBuf, CollaboratorError>;
}
