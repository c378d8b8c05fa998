use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use serde::Deserialize;

use crate::application::ports::{TextExtractor, TextExtractorError};

pub const POLL_TIMEOUT: Duration = Duration::from_secs(300);
pub const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
pub const MAX_BACKOFF: Duration = Duration::from_secs(60);
pub const API_VERSION: &str = "2024-11-30";

/// OCR collaborator backed by Azure Document Intelligence: submit the file,
/// then poll the returned operation until the analysis settles.
pub struct AzureOcrAdapter {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl AzureOcrAdapter {
    pub fn new(endpoint: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client build never fails with valid TLS config");
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn submit(&self, data: &[u8]) -> Result<String, TextExtractorError> {
        let b64 = general_purpose::STANDARD.encode(data);
        let body = serde_json::json!({ "base64Source": b64 });

        let url = format!(
            "{}/documentintelligence/documentModels/prebuilt-read:analyze?api-version={}",
            self.endpoint, API_VERSION
        );

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TextExtractorError::ExtractionFailed(format!("submit failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(TextExtractorError::ExtractionFailed(format!(
                "submit returned {status}: {text}"
            )));
        }

        let operation_url = response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                TextExtractorError::ExtractionFailed(
                    "response missing Operation-Location header".to_string(),
                )
            })?
            .to_string();

        Ok(operation_url)
    }

    async fn poll_until_complete(&self, operation_url: &str) -> Result<String, TextExtractorError> {
        let poll_future = async {
            let mut backoff = INITIAL_BACKOFF;

            loop {
                let response = self
                    .client
                    .get(operation_url)
                    .header("Ocp-Apim-Subscription-Key", &self.api_key)
                    .send()
                    .await
                    .map_err(|e| {
                        TextExtractorError::ExtractionFailed(format!("poll failed: {e}"))
                    })?;

                if !response.status().is_success() {
                    let status = response.status();
                    let text = response.text().await.unwrap_or_default();
                    return Err(TextExtractorError::ExtractionFailed(format!(
                        "poll returned {status}: {text}"
                    )));
                }

                let result: AnalyzeResponse = response.json().await.map_err(|e| {
                    TextExtractorError::ExtractionFailed(format!("response parse failed: {e}"))
                })?;

                match result.status.as_str() {
                    "succeeded" => {
                        let content = result.analyze_result.map(|r| r.content).unwrap_or_default();
                        return Ok(content);
                    }
                    "failed" => {
                        return Err(TextExtractorError::ExtractionFailed(
                            "document analysis failed".to_string(),
                        ));
                    }
                    _ => {
                        tokio::time::sleep(backoff).await;
                        backoff = (backoff * 2).min(MAX_BACKOFF);
                    }
                }
            }
        };

        tokio::time::timeout(POLL_TIMEOUT, poll_future)
            .await
            .map_err(|_| {
                TextExtractorError::ExtractionFailed(format!(
                    "analysis polling timed out after {}s",
                    POLL_TIMEOUT.as_secs()
                ))
            })?
    }
}

#[async_trait]
impl TextExtractor for AzureOcrAdapter {
    #[tracing::instrument(skip(self, data), fields(file_name = %original_file_name, bytes = data.len()))]
    async fn extract_text(
        &self,
        data: &[u8],
        original_file_name: &str,
    ) -> Result<String, TextExtractorError> {
        let operation_url = self.submit(data).await?;
        let text = self.poll_until_complete(&operation_url).await?;
        tracing::debug!(chars = text.len(), "OCR extraction complete");
        Ok(text)
    }
}

#[derive(Deserialize)]
struct AnalyzeResponse {
    status: String,
    #[serde(rename = "analyzeResult")]
    analyze_result: Option<AnalyzeResult>,
}

#[derive(Deserialize)]
struct AnalyzeResult {
    content: String,
}
