//! OpenRouter chat-completions client for image generation

use super::{truncate, CollaboratorError, ImageGenerator, ImageRequest};
use crate::error::{SpotforgeError, SpotforgeResult};
use crate::models::ImageConfig;
use crate::planner::IMAGE_SYSTEM_PROMPT;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info, instrument, warn};

/// Smallest `content` string treated as a bare base64 payload
const BARE_BASE64_MIN_LEN: usize = 1000;

/// Image generation through an OpenRouter-routed multimodal model
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    config: ImageConfig,
    debug_dir: Option<PathBuf>,
}

impl OpenRouterClient {
    pub fn new(api_key: impl Into<String>, config: ImageConfig) -> SpotforgeResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| SpotforgeError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
            debug_dir: None,
        })
    }

    /// Dump unparseable responses into `dir`
    pub fn with_debug_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.debug_dir = Some(dir.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Chat-completions payload: system prompt, text part, optional product photo
    pub async fn build_payload(&self, request: &ImageRequest) -> Value {
        let mut content = vec![json!({
            "type": "text",
            "text": request.prompt,
        })];

        if let Some(path) = &request.reference_image {
            match tokio::fs::read(path).await {
                Ok(bytes) => {
                    debug!(path = %path.display(), bytes = bytes.len(), "attaching product image");
                    content.push(json!({
                        "type": "image_url",
                        "image_url": {
                            "url": format!("data:{};base64,{}", mime_for(path), BASE64.encode(&bytes)),
                        },
                    }));
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to read product image, proceeding without fusion"
                    );
                }
            }
        }

        json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": IMAGE_SYSTEM_PROMPT },
                { "role": "user", "content": content },
            ],
            "modalities": ["image", "text"],
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
        })
    }

    async fn send_once(&self, payload: &Value) -> Result<Vec<u8>, CollaboratorError> {
        let response = self
            .client
            .post(&self.config.base_url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.config.referer)
            .header("X-Title", &self.config.title)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::from_status(status.as_u16(), &body));
        }

        let body: Value = response.json().await?;
        match extract_image(&body) {
            Some(bytes) => Ok(bytes),
            None => {
                self.dump_debug_response(&body).await;
                Err(CollaboratorError::InvalidResponse(format!(
                    "no image data in response (keys: {})",
                    top_level_keys(&body)
                )))
            }
        }
    }

    async fn dump_debug_response(&self, body: &Value) {
        let Some(dir) = &self.debug_dir else {
            return;
        };
        let path = dir.join(format!(
            "api_response_debug_{}.json",
            chrono::Utc::now().timestamp_millis()
        ));
        let content = serde_json::to_string_pretty(&truncate_contents(body.clone()))
            .unwrap_or_default();
        match tokio::fs::write(&path, content).await {
            Ok(()) => info!(path = %path.display(), "saved unparseable response"),
            Err(e) => warn!(error = %e, "failed to save debug response"),
        }
    }
}

#[async_trait]
impl ImageGenerator for OpenRouterClient {
    #[instrument(skip(self, request), fields(panel = request.panel_id))]
    async fn generate(&self, request: &ImageRequest) -> Result<Vec<u8>, CollaboratorError> {
        let payload = self.build_payload(request).await;
        let attempts = self.config.retries + 1;

        let mut attempt = 1;
        loop {
            debug!(attempt, attempts, model = %self.config.model, "calling OpenRouter");
            match self.send_once(&payload).await {
                Ok(bytes) => {
                    info!(bytes = bytes.len(), "image received");
                    return Ok(bytes);
                }
                Err(e) if e.is_retryable() && attempt < attempts => {
                    warn!(attempt, error = %e, "image request failed, retrying");
                    tokio::time::sleep(self.config.retry_delay()).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

fn data_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"data:image/\w+;base64,([A-Za-z0-9+/=]+)").expect("static regex is valid")
    })
}

fn decode_base64(data: &str) -> Option<Vec<u8>> {
    let cleaned: String = data.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64.decode(cleaned).ok().filter(|bytes| !bytes.is_empty())
}

/// Pull image bytes out of a chat-completions response.
///
/// Checked in order: `message.images[0].image_url.url` data URL, a data URL
/// embedded in `message.content`, a bare base64 `content`, and a top-level
/// `images[0].data`.
pub fn extract_image(response: &Value) -> Option<Vec<u8>> {
    let message = response.pointer("/choices/0/message");

    if let Some(url) = message
        .and_then(|m| m.pointer("/images/0/image_url/url"))
        .and_then(Value::as_str)
    {
        if let Some((_, data)) = url.split_once("base64,") {
            if let Some(bytes) = decode_base64(data) {
                return Some(bytes);
            }
        }
    }

    if let Some(content) = message.and_then(|m| m.get("content")) {
        let text = match content {
            Value::String(s) => s.clone(),
            Value::Array(parts) => parts
                .iter()
                .filter_map(|p| p.get("text").and_then(Value::as_str))
                .collect::<Vec<_>>()
                .join(""),
            _ => String::new(),
        };

        if let Some(caps) = data_url_regex().captures(&text) {
            if let Some(bytes) = decode_base64(&caps[1]) {
                return Some(bytes);
            }
        }

        if text.len() > BARE_BASE64_MIN_LEN {
            if let Some(bytes) = decode_base64(&text) {
                return Some(bytes);
            }
        }
    }

    response
        .pointer("/images/0/data")
        .and_then(Value::as_str)
        .and_then(decode_base64)
}

fn top_level_keys(value: &Value) -> String {
    value
        .as_object()
        .map(|o| o.keys().cloned().collect::<Vec<_>>().join(", "))
        .unwrap_or_default()
}

/// Shorten long message contents so the dump stays readable
fn truncate_contents(mut value: Value) -> Value {
    if let Some(choices) = value.get_mut("choices").and_then(Value::as_array_mut) {
        for choice in choices {
            if let Some(content) = choice.pointer_mut("/message/content") {
                if let Value::String(s) = content {
                    *s = truncate(s, 500);
                }
            }
        }
    }
    value
}
