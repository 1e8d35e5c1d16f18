//! Azure OpenAI chat-completions client.
//!
//! Wraps a single `POST .../chat/completions` call using [`reqwest`]. Every
//! call is bounded by the configured request timeout and is attempted
//! exactly once.

use std::time::Duration;

use crate::config::AzureOpenAiConfig;
use crate::error::{truncate_chars, AnalyzerError, ERROR_BODY_LIMIT};
use crate::messages::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat, Role};
use crate::{AnalysisRequest, Analyzer};

/// HTTP client for one Azure OpenAI deployment.
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for AzureOpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAiClient")
            .field("url", &self.url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl AzureOpenAiClient {
    /// Create a client for the configured deployment.
    ///
    /// Fails with [`AnalyzerError::Configuration`] if endpoint, deployment,
    /// or key are blank. No request is made here.
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, AnalyzerError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AnalyzerError::Transport)?;
        Self::with_client(client, &config)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// Validates `config` like [`AzureOpenAiClient::new`]. The caller's
    /// client keeps its own timeout settings; the configured
    /// `request_timeout` is still applied per request.
    pub fn with_client(
        client: reqwest::Client,
        config: &AzureOpenAiConfig,
    ) -> Result<Self, AnalyzerError> {
        config.validate()?;
        Ok(Self {
            client,
            url: config.completions_url(),
            api_key: config.api_key.clone(),
            timeout: config.request_timeout,
        })
    }

    // ---- private helpers ----

    /// Map a reqwest failure onto the analyzer taxonomy.
    fn classify(&self, err: reqwest::Error) -> AnalyzerError {
        if err.is_timeout() {
            AnalyzerError::Timeout {
                after: self.timeout,
            }
        } else {
            AnalyzerError::Transport(err)
        }
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or [`AnalyzerError::Provider`] with
    /// the status and a truncated body on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, AnalyzerError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AnalyzerError::Provider {
                status: status.as_u16(),
                body: truncate_chars(&body, ERROR_BODY_LIMIT),
            });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl Analyzer for AzureOpenAiClient {
    async fn analyze_raw(&self, request: &AnalysisRequest) -> Result<String, AnalyzerError> {
        let body = ChatCompletionRequest {
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: Role::User,
                    content: &request.user_text,
                },
            ],
            max_completion_tokens: request.max_output_tokens,
            response_format: ResponseFormat::JSON_OBJECT,
        };

        let response = self
            .client
            .post(&self.url)
            .header("api-key", &self.api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let response = Self::ensure_success(response).await?;

        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(AnalyzerError::EmptyResponse);
        }

        let completion: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| AnalyzerError::InvalidResponse(e.to_string()))?;

        if let Some(reason) = completion
            .choices
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            if reason != "stop" {
                tracing::warn!(finish_reason = reason, "Analyzer output may be incomplete");
            }
        }

        completion.first_content().ok_or(AnalyzerError::EmptyResponse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
