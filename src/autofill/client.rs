use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use super::prompt::{self, AutofillRequest};
use super::schema::{response_schema, AiGeneratedDetails};
use crate::config::Config;
use crate::error::ArchitectError;
use crate::prompt::model::ReferenceImage;

/// LLM client for auto-filling project fields
#[derive(Clone)]
pub struct AutofillClient {
    api_key: String,
    model: String,
    provider: String,
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

impl AutofillClient {
    pub fn new(config: &Config, api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: config.llm.model().to_string(),
            provider: config.llm.provider.clone(),
            base_url: config.llm.base_url().to_string(),
            http: reqwest::Client::new(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Ask the model for field values matching `request`
    pub async fn generate_details(
        &self,
        request: &AutofillRequest,
        images: &[ReferenceImage],
    ) -> Result<AiGeneratedDetails> {
        let full_prompt = prompt::build_prompt(request);
        info!(
            provider = %self.provider,
            model = %self.model,
            images = images.len(),
            "Requesting auto-fill"
        );

        let response_text = match self.provider.as_str() {
            "gemini" => self.call_gemini(&full_prompt, images).await?,
            "anthropic" => self.call_anthropic(&full_prompt, images).await?,
            "openai" | "lmstudio" | "custom" | "openrouter" => {
                self.call_openai_compatible(&full_prompt, images).await?
            }
            _ => {
                return Err(ArchitectError::ConfigError(format!(
                    "Unknown provider: {}",
                    self.provider
                ))
                .into())
            }
        };
        debug!(chars = response_text.len(), "Received auto-fill response");

        Self::parse_details(&response_text)
    }

    /// Parse a raw model reply, tolerating markdown code fences
    pub fn parse_details(text: &str) -> Result<AiGeneratedDetails> {
        let json_text = Self::extract_json(text);
        serde_json::from_str(&json_text).map_err(|e| {
            ArchitectError::InvalidResponse(format!("{}: {}", e, text.trim())).into()
        })
    }

    /// Extract JSON from a response that might be wrapped in markdown code blocks
    fn extract_json(text: &str) -> String {
        let trimmed = text.trim();

        if let Some(without_start) = trimmed
            .strip_prefix("```json")
            .or_else(|| trimmed.strip_prefix("```"))
        {
            if let Some(end_pos) = without_start.rfind("```") {
                return without_start[..end_pos].trim().to_string();
            }
        }

        trimmed.to_string()
    }

    async fn error_from(response: reqwest::Response, source: &str) -> anyhow::Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        ArchitectError::ApiError(format!("{} ({}): {}", source, status, body)).into()
    }

    async fn call_gemini(&self, prompt: &str, images: &[ReferenceImage]) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let mut parts = vec![json!({ "text": prompt })];
        parts.extend(images.iter().map(|img| {
            json!({ "inlineData": { "mimeType": img.mime_type, "data": img.base64 } })
        }));

        let request = json!({
            "contents": [{ "role": "user", "parts": parts }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        });

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Gemini API error").await);
        }

        let response: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        response["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ArchitectError::InvalidResponse("Empty response from Gemini".into()).into())
    }

    async fn call_anthropic(&self, prompt: &str, images: &[ReferenceImage]) -> Result<String> {
        let mut content: Vec<serde_json::Value> = images
            .iter()
            .map(|img| {
                json!({
                    "type": "image",
                    "source": { "type": "base64", "media_type": img.mime_type, "data": img.base64 }
                })
            })
            .collect();
        content.push(json!({ "type": "text", "text": prompt }));

        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: 4096,
            messages: vec![Message {
                role: "user".to_string(),
                content,
            }],
        };

        let url = format!("{}/messages", self.base_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            return Err(Self::error_from(response, "Anthropic API error").await);
        }

        let response: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse Anthropic response")?;

        response
            .content
            .first()
            .and_then(|block| block.text.clone())
            .ok_or_else(|| ArchitectError::InvalidResponse("Empty response from Anthropic".into()).into())
    }

    /// Call OpenAI-compatible API (OpenAI, OpenRouter, LM Studio, custom endpoints)
    async fn call_openai_compatible(
        &self,
        prompt: &str,
        images: &[ReferenceImage],
    ) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let mut content = vec![json!({ "type": "text", "text": prompt })];
        content.extend(images.iter().map(|img| {
            json!({
                "type": "image_url",
                "image_url": { "url": format!("data:{};base64,{}", img.mime_type, img.base64) }
            })
        }));

        let request = json!({
            "model": self.model,
            "messages": [
                { "role": "user", "content": content }
            ],
            "max_tokens": 4096
        });

        let mut req_builder = self
            .http
            .post(&url)
            .header("content-type", "application/json")
            .json(&request);

        // LM Studio runs without auth
        if !self.api_key.is_empty() && self.api_key != "dummy" {
            req_builder = req_builder.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = req_builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {}", url))?;

        if !response.status().is_success() {
            let source = format!("API error from {}", url);
            return Err(Self::error_from(response, &source).await);
        }

        let response: serde_json::Value = response
            .json()
            .await
            .context("Failed to parse API response")?;

        response["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                ArchitectError::InvalidResponse(format!("Empty response from {}", self.provider))
                    .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_markdown_fences() {
        let text = "```json\n{\"title\": \"x\"}\n```";
        let details = AutofillClient::parse_details(text).unwrap();
        assert_eq!(details.title.as_deref(), Some("x"));

        let bare = "```\n{}\n```";
        assert_eq!(
            AutofillClient::parse_details(bare).unwrap(),
            AiGeneratedDetails::default()
        );
    }

    #[test]
    fn garbage_is_an_invalid_response() {
        let err = AutofillClient::parse_details("Sorry, I can't help with that.").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ArchitectError>(),
            Some(ArchitectError::InvalidResponse(_))
        ));
    }

    #[test]
    fn client_takes_provider_defaults() {
        let config = Config::default();
        let client = AutofillClient::new(&config, "key");
        assert_eq!(client.provider(), "gemini");
        assert_eq!(client.model, "gemini-2.5-flash");
    }
}
