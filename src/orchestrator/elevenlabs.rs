use super::{CollaboratorError, Narrator};
use crate::error::{SpotforgeError, SpotforgeResult};
use crate::models::NarrationConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

/// ElevenLabs text-to-speech client
#[derive(Debug, Clone)]
pub struct ElevenLabsClient {
    client: Client,
    api_key: String,
    config: NarrationConfig,
}

impl ElevenLabsClient {
    pub fn new(api_key: impl Into<String>, config: NarrationConfig) -> SpotforgeResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SpotforgeError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    fn endpoint(&self, voice_id: &str) -> String {
        format!(
            "{}/text-to-speech/{}",
            self.config.base_url.trim_end_matches('/'),
            voice_id
        )
    }
}

#[async_trait]
impl Narrator for ElevenLabsClient {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, CollaboratorError> {
        let voice_id = self.config.resolve_voice(voice_id);
        debug!(voice_id, "requesting narration");

        let response = self
            .client
            .post(self.endpoint(voice_id))
            .header("xi-api-key", &self.api_key)
            .header("Accept", "audio/mpeg")
            .json(&json!({
                "text": text,
                "model_id": self.config.model_id,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::from_status(status.as_u16(), &body));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(CollaboratorError::InvalidResponse(
                "empty audio body".to_string(),
            ));
        }
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = NarrationConfig {
            base_url: "http://localhost:9000/v1/".to_string(),
            ..NarrationConfig::default()
        };
        let client = ElevenLabsClient::new("key", config).unwrap();
        assert_eq!(
            client.endpoint("voice"),
            "http://localhost:9000/v1/text-to-speech/voice"
        );
    }
}
