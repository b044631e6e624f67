use thiserror::Error;

/// AI boundary error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AiError {
    /// The request we were about to send is unusable (e.g. empty item list).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The response is not the JSON shape the contract promises.
    #[error("response violates the schema: {0}")]
    Schema(String),

    /// The response parsed, but a suggestion contradicts the request context
    /// (unknown item/vendor, vendor that doesn't supply the item, ...).
    #[error("invalid suggestion: {0}")]
    InvalidSuggestion(String),

    /// The call to the model service failed.
    #[error("transport failure: {0}")]
    Transport(String),
}
