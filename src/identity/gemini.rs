use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::GeneratorSettings,
    identity::{prompt, IdentityGenerator},
    models::{GeneratedIdentity, IdentityError, Result, ScoreResult, WalletMetrics},
};

/// Identity generator backed by Google's Gemini `generateContent` API.
pub struct GeminiGenerator {
    http_client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiGenerator {
    pub fn new(settings: &GeneratorSettings, api_key: String) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key,
            model: settings.model.clone(),
            temperature: settings.temperature,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

/// Pull the `{name, verdict}` object out of a model reply.
///
/// Models sometimes wrap JSON in Markdown fences or add a preamble, so the
/// outermost braces are located before parsing.
pub fn parse_identity(text: &str) -> Result<GeneratedIdentity> {
    let start = text.find('{');
    let end = text.rfind('}');

    let body = match (start, end) {
        (Some(start), Some(end)) if start < end => &text[start..=end],
        _ => {
            return Err(IdentityError::GenerationError(format!(
                "No JSON object in model reply: {}",
                text.chars().take(120).collect::<String>()
            )))
        }
    };

    let identity: GeneratedIdentity = serde_json::from_str(body)?;
    if identity.name.trim().is_empty() {
        return Err(IdentityError::GenerationError("Model returned an empty name".to_string()));
    }

    Ok(GeneratedIdentity {
        name: identity.name.trim().to_string(),
        verdict: identity.verdict.trim().to_string(),
    })
}

#[async_trait]
impl IdentityGenerator for GeminiGenerator {
    async fn generate(&self, score: &ScoreResult, stats: &WalletMetrics) -> Result<GeneratedIdentity> {
        let body = json!({
            "systemInstruction": {
                "parts": [{ "text": prompt::system_instruction() }]
            },
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt::wallet_summary(score, stats) }]
            }],
            "generationConfig": {
                "temperature": self.temperature,
                "responseMimeType": "application/json"
            }
        });

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(IdentityError::GenerationError(format!(
                "Gemini returned {}: {}",
                status,
                detail.chars().take(200).collect::<String>()
            )));
        }

        let reply: GenerateContentResponse = response.json().await?;
        let text: String = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        debug!("Gemini reply for {}: {}", stats.address, text);
        parse_identity(&text)
    }
}
