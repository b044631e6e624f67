//! Transport seam for the model service.

use async_trait::async_trait;

use crate::error::AiError;

/// Sends a rendered prompt to the model service and returns the raw response
/// text.
///
/// Implementations live in infrastructure; the flows in this crate only
/// depend on the seam. Callers rely on the underlying HTTP client's default
/// timeouts; there is no cancellation beyond dropping the future.
#[async_trait]
pub trait SuggestionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AiError>;
}
