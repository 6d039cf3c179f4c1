use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use emojimind_core::{GuessOracle, build_prompt, parse_guesses};
use emojimind_types::Difficulty;

const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.0-flash";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Guess oracle backed by the Gemini generateContent API. The request is
/// bounded by the client timeout; callers degrade an error to an empty
/// guess list rather than surfacing it to the player.
pub struct GeminiOracle {
    client: Client,
    api_key: String,
}

impl GeminiOracle {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_key })
    }
}

#[async_trait]
impl GuessOracle for GeminiOracle {
    async fn guess(&self, emojis: &str, difficulty: Difficulty) -> Result<Vec<String>> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_ENDPOINT, GEMINI_MODEL, self.api_key
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(emojis, difficulty),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "Gemini request failed with status {}",
                response.status()
            ));
        }

        let body: GenerateContentResponse = response.json().await?;
        let text = body
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        debug!("Oracle raw response for {}: {}", difficulty, text);
        Ok(parse_guesses(&text, difficulty))
    }
}
