use serde::{Deserialize, Serialize};

use super::{build_http_client, read_json, ProviderError, COMPLETION};
use crate::configuration::CompletionSettings;

#[derive(Serialize, Debug, Clone)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: "user",
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI style chat completion endpoint.
pub struct CompletionClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl CompletionClient {
    pub fn new(settings: &CompletionSettings) -> Result<Self, reqwest::Error> {
        Ok(CompletionClient {
            client: build_http_client(settings.timeout_seconds)?,
            endpoint: format!(
                "{}/chat/completions",
                settings.base_url.trim_end_matches('/')
            ),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
        })
    }

    /// Sends the conversation and returns the text of the first choice.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        tracing::info!(
            "Requesting completion from {} ({} messages)",
            self.model,
            messages.len()
        );
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.model,
                messages,
                max_tokens: self.max_tokens,
            })
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                provider: COMPLETION,
                source,
            })?;
        let body: ChatResponse = read_json(COMPLETION, response, |body| {
            body["error"]["message"].as_str().map(str::to_string)
        })
        .await?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderError::EmptyCompletion {
                provider: COMPLETION,
            })
    }
}
