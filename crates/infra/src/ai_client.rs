//! Transport implementations for the AI suggestion contract.

use async_trait::async_trait;

use clinistock_ai::AiError;
use clinistock_ai::client::SuggestionClient;

/// Client that returns a fixed response. For dev and tests.
#[derive(Debug, Clone)]
pub struct CannedSuggestionClient {
    response: String,
}

impl CannedSuggestionClient {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

#[async_trait]
impl SuggestionClient for CannedSuggestionClient {
    async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
        Ok(self.response.clone())
    }
}

/// Client that POSTs the prompt to a completion endpoint.
///
/// Request body is `{"model": ..., "prompt": ...}` and the response is
/// expected to carry the model text under `"text"`.
#[cfg(feature = "http-ai")]
pub struct HttpSuggestionClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

#[cfg(feature = "http-ai")]
impl HttpSuggestionClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[cfg(feature = "http-ai")]
#[async_trait]
impl SuggestionClient for HttpSuggestionClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiError> {
        #[derive(serde::Serialize)]
        struct CompletionRequest<'a> {
            model: &'a str,
            prompt: &'a str,
        }

        #[derive(serde::Deserialize)]
        struct CompletionResponse {
            text: String,
        }

        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&CompletionRequest {
                model: &self.model,
                prompt,
            })
            .send()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let response = response
            .error_for_status()
            .map_err(|e| AiError::Transport(e.to_string()))?;

        let body: CompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;
        Ok(body.text)
    }
}
