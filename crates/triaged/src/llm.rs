//! Text-generation capability - trait abstraction plus the Ollama client.
//!
//! Production code uses `OllamaGenerator` against a local Ollama server.
//! Test code uses `ScriptedGenerator` with pre-configured responses, so the
//! triage pipeline can be exercised deterministically without a model.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::LlmConfig;

/// Fixed sampling parameters for one generation call.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub repeat_penalty: f32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_tokens: 300,
            temperature: 0.2,
            top_k: 40,
            top_p: 0.9,
            repeat_penalty: 1.1,
        }
    }
}

impl From<&LlmConfig> for SamplingParams {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            top_k: config.top_k,
            top_p: config.top_p,
            repeat_penalty: config.repeat_penalty,
        }
    }
}

/// Opaque text-completion capability.
///
/// The orchestrator never talks to Ollama directly; it sees only this
/// interface, injected at construction.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` into raw text. An error means the model is
    /// unreachable or failed mid-generation; callers degrade rather than
    /// propagate.
    async fn generate(&self, prompt: &str, params: SamplingParams) -> Result<String>;

    /// Whether the backing model can currently serve requests.
    async fn is_available(&self) -> bool;
}

/// Ollama-backed text generator.
pub struct OllamaGenerator {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.ollama_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str, params: SamplingParams) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": {
                "num_predict": params.max_tokens,
                "temperature": params.temperature,
                "top_k": params.top_k,
                "top_p": params.top_p,
                "repeat_penalty": params.repeat_penalty,
            }
        });

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!("Ollama request failed: {}", response.status()));
        }

        let json: serde_json::Value = response.json().await?;
        let text = json
            .get("response")
            .and_then(|r| r.as_str())
            .unwrap_or("")
            .to_string();

        Ok(text)
    }

    async fn is_available(&self) -> bool {
        self.http_client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }
}

/// Scripted generator for deterministic tests.
///
/// Returns pre-configured responses in order; an unavailable instance fails
/// every call, which exercises the model-down fallback path.
pub struct ScriptedGenerator {
    responses: Mutex<VecDeque<String>>,
    available: bool,
}

impl ScriptedGenerator {
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            available: true,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            available: false,
        }
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str, _params: SamplingParams) -> Result<String> {
        if !self.available {
            return Err(anyhow!("model not loaded"));
        }
        let mut responses = self.responses.lock().unwrap();
        responses
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted response left"))
    }

    async fn is_available(&self) -> bool {
        self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_generator_plays_in_order() {
        let gen = ScriptedGenerator::with_responses(["first", "second"]);
        assert!(gen.is_available().await);
        assert_eq!(gen.generate("p", SamplingParams::default()).await.unwrap(), "first");
        assert_eq!(gen.generate("p", SamplingParams::default()).await.unwrap(), "second");
        assert!(gen.generate("p", SamplingParams::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_unavailable_generator_errors() {
        let gen = ScriptedGenerator::unavailable();
        assert!(!gen.is_available().await);
        assert!(gen.generate("p", SamplingParams::default()).await.is_err());
    }

    #[test]
    fn test_sampling_params_from_config() {
        let config = LlmConfig::default();
        let params = SamplingParams::from(&config);
        assert_eq!(params.max_tokens, config.max_tokens);
        assert_eq!(params.temperature, config.temperature);
    }
}
