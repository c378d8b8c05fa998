use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{ChatTurn, LlmClient, LlmClientError};
use crate::domain::{BlobPathname, MessageSender};

const COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    chat_model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiClient {
    pub fn new(api_key: String, chat_model: String, max_tokens: u32, temperature: f32) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            api_key,
            chat_model,
            max_tokens,
            temperature,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    #[tracing::instrument(skip_all, fields(prior_turns = prior_turns.len()))]
    async fn get_completion(
        &self,
        user_text: &str,
        prior_turns: &[ChatTurn],
        source_text: Option<&str>,
        source_blob: Option<&BlobPathname>,
    ) -> Result<String, LlmClientError> {
        let system = match source_text {
            Some(text) => format!(
                "You are an assistant answering questions about a document the user uploaded.\n\nDocument text:\n{}",
                text
            ),
            None => "You are an assistant answering questions about a document the user uploaded earlier in this conversation.".to_string(),
        };

        if let Some(blob) = source_blob {
            tracing::debug!(blob = %blob, "Completion references an uploaded document");
        }

        let mut messages = vec![serde_json::json!({ "role": "system", "content": system })];
        for turn in prior_turns {
            let role = match turn.sender {
                MessageSender::User => "user",
                MessageSender::Bot => "assistant",
            };
            messages.push(serde_json::json!({ "role": role, "content": turn.content }));
        }
        messages.push(serde_json::json!({ "role": "user", "content": user_text }));

        let body = serde_json::json!({
            "model": self.chat_model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmClientError::ApiRequestFailed(e.to_string()))?;

        if response.status().as_u16() == 429 {
            return Err(LlmClientError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(LlmClientError::ApiRequestFailed(format!(
                "completion returned {status}: {text}"
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmClientError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmClientError::InvalidResponse("no choices in response".to_string()))
    }
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}
