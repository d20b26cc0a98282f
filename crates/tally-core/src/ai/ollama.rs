//! Ollama classification backend
//!
//! Sends the whole batch of unresolved merchants as a single chat request.
//! The call is the only long-blocking, transiently-failing operation in the
//! pipeline, so it gets a small bounded retry loop with exponential backoff;
//! after that its failure is the caller's problem (and is non-fatal there).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::categories::ALLOWED_CATEGORIES;
use crate::error::{Error, Result};

use super::parsing::parse_numbered_categories;
use super::Classifier;

const MAX_ATTEMPTS: u32 = 3;

/// Ollama chat backend for batched merchant classification
#[derive(Clone)]
pub struct OllamaClassifier {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaClassifier {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2:3b".to_string());
        Some(Self::new(&host, &model))
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<String> {
        let mut last_err: Option<Error> = None;

        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                let wait = Duration::from_secs(2u64 << (attempt - 1));
                warn!(attempt, wait_secs = wait.as_secs(), "Ollama not ready, retrying");
                tokio::time::sleep(wait).await;
            }

            let response = match self
                .http_client
                .post(format!("{}/api/chat", self.base_url))
                .json(request)
                .send()
                .await
            {
                Ok(resp) => resp,
                Err(e) => {
                    last_err = Some(Error::Http(e));
                    continue;
                }
            };

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::ClassificationUnavailable(format!(
                    "Ollama returned status {}: {}",
                    status, body
                )));
            }

            let chat_response: ChatResponse = response.json().await?;
            return Ok(chat_response.message.content);
        }

        Err(Error::ClassificationUnavailable(format!(
            "Ollama failed after {} attempts: {}",
            MAX_ATTEMPTS,
            last_err.map(|e| e.to_string()).unwrap_or_default()
        )))
    }
}

/// Request to the Ollama chat API
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Response from the Ollama chat API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

/// Build the batched classification prompt: category rules plus the numbered
/// merchant list whose ordinals key the response.
fn build_prompt(merchants: &[String]) -> String {
    let mut merchant_list = String::new();
    for (i, m) in merchants.iter().enumerate() {
        merchant_list.push_str(&format!("{}. {}\n", i + 1, m));
    }

    format!(
        r#"Given a list of merchant names from Singapore bank statements, classify each into exactly one category.

Categories: {}

Rules:
- "drinks" = bubble tea, coffee chains, tea brands (e.g. KOI, Chagee, Starbucks, Old Tea Hut, Mr Coconut)
- "food" = restaurants, hawker stalls, bakeries, fast food
- "travel" = flights, hotels, car rental, travel bookings, travel insurance
- "transport" = MRT, bus, taxi, Grab
- "transfers" = personal fund transfers (PayNow, FAST), bill payments to credit cards
- "investment" = brokerage (IBKR), CPF voluntary contributions, Wise transfers for investment
- "insurance" = insurance premiums
- "subscriptions" = recurring digital services (Spotify, Netflix, etc.)
- "lifestyle" = shopping, beauty, personal care
- "groceries" = supermarkets (NTUC, Cold Storage)
- "education" = courses, training
- "misc" = anything that doesn't clearly fit

Respond with ONLY a JSON object where the keys are the merchant numbers (as strings like "1", "2", etc.) and values are the category. No explanation, no markdown, just the raw JSON object.

Example response format: {{"1": "food", "2": "travel", "3": "misc"}}

Merchants:
{}"#,
        ALLOWED_CATEGORIES.join(", "),
        merchant_list
    )
}

#[async_trait]
impl Classifier for OllamaClassifier {
    async fn classify_merchants(&self, merchants: &[String]) -> Result<HashMap<String, String>> {
        if merchants.is_empty() {
            return Ok(HashMap::new());
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a financial transaction categoriser. Respond with ONLY \
                              valid JSON, no markdown, no explanation."
                        .to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(merchants),
                },
            ],
            stream: false,
            options: ChatOptions { temperature: 0.1 },
        };

        let content = self.send_chat(&request).await?;
        debug!(response = %content, "Ollama classification response");

        parse_numbered_categories(&content, merchants)
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_numbers_merchants() {
        let merchants = vec!["KOI THE".to_string(), "GRAB".to_string()];
        let prompt = build_prompt(&merchants);
        assert!(prompt.contains("1. KOI THE"));
        assert!(prompt.contains("2. GRAB"));
        assert!(prompt.contains("food, drinks, travel"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = OllamaClassifier::new("http://localhost:11434/", "llama3.2:3b");
        assert_eq!(backend.host(), "http://localhost:11434");
    }
}
